// src/translate/protognosis.rs
// Multi-agent-schema (ProtoGnosis) translation
//
// The engine stores free-form content plus a metadata bag carrying title,
// description, strategy, and optional per-criterion numeric scores. Titles
// missing from metadata are derived heuristically from the content.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::JnanaError;
use crate::hypothesis::{HypothesisType, ScientificHallmarks, TournamentRecord, UnifiedHypothesis};
use crate::translate::title::extract_title;
use crate::utils::{epoch_to_iso, now_epoch};

/// Default per-criterion score when the engine did not grade a hallmark.
const DEFAULT_HALLMARK_SCORE: f64 = 7.0;

const HALLMARK_SCORE_KEYS: [&str; 5] = [
    "testability_score",
    "specificity_score",
    "grounded_knowledge_score",
    "predictive_power_score",
    "parsimony_score",
];

/// One hypothesis as the multi-agent engine stores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtognosisHypothesis {
    pub hypothesis_id: String,
    pub agent_id: String,
    pub content: String,
    pub summary: String,
    pub metadata: Map<String, Value>,
    pub created_at: f64,
    pub updated_at: f64,
    pub version: u32,
    pub parent_id: Option<String>,
    pub children_ids: Vec<String>,
    pub evaluation_scores: BTreeMap<String, f64>,
    pub tournament_record: TournamentRecord,
}

/// Decode a raw session item into a unified record.
pub fn decode(value: &Value) -> Result<UnifiedHypothesis, JnanaError> {
    let protognosis: ProtognosisHypothesis = serde_json::from_value(value.clone())
        .map_err(|e| JnanaError::Translation(format!("multi-agent hypothesis: {e}")))?;
    Ok(from_protognosis(protognosis))
}

/// Convert a multi-agent-schema hypothesis into the unified record.
pub fn from_protognosis(protognosis: ProtognosisHypothesis) -> UnifiedHypothesis {
    let hypothesis_id = if protognosis.hypothesis_id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        protognosis.hypothesis_id
    };

    let metadata_str = |key: &str| {
        protognosis
            .metadata
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let title = metadata_str("title")
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| extract_title(&protognosis.content));
    let description = metadata_str("description")
        .filter(|d| !d.is_empty())
        .or_else(|| Some(protognosis.summary.clone()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| protognosis.content.clone());
    let generation_strategy = metadata_str("generation_strategy")
        .or_else(|| metadata_str("strategy"))
        .unwrap_or_default();

    let score = |key: &str| {
        protognosis
            .metadata
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_HALLMARK_SCORE)
    };
    let hallmarks = ScientificHallmarks {
        testability: render_score(score("testability_score")),
        specificity: render_score(score("specificity_score")),
        grounded_knowledge: render_score(score("grounded_knowledge_score")),
        predictive_power: render_score(score("predictive_power_score")),
        parsimony: render_score(score("parsimony_score")),
    };

    let created_at = if protognosis.created_at > 0.0 {
        protognosis.created_at
    } else {
        now_epoch()
    };
    let updated_at = if protognosis.updated_at > 0.0 {
        protognosis.updated_at
    } else {
        created_at
    };
    let version = protognosis.version.max(1);

    let mut metadata = protognosis.metadata.clone();
    if !protognosis.agent_id.is_empty() {
        metadata.insert(
            "protognosis_agent_id".to_string(),
            Value::from(protognosis.agent_id),
        );
    }
    metadata.insert("conversion_timestamp".to_string(), Value::from(now_epoch()));

    let mut unified = UnifiedHypothesis {
        hypothesis_id,
        title,
        content: protognosis.content,
        description,
        created_at,
        updated_at,
        generation_timestamp: epoch_to_iso(created_at),
        version,
        version_string: format!("1.{}", version - 1),
        hypothesis_type: HypothesisType::ProtognosisGenerated,
        parent_id: protognosis.parent_id,
        children_ids: protognosis.children_ids,
        hallmarks,
        evaluation_scores: protognosis.evaluation_scores,
        tournament_record: protognosis.tournament_record,
        generation_strategy,
        metadata,
        ..UnifiedHypothesis::default()
    };

    unified.synchronize_text();
    unified
}

/// Convert a unified record back into the multi-agent schema.
///
/// Hallmark fields are packed back into the metadata bag alongside a fresh
/// conversion timestamp; round-trip identifiers are preserved.
pub fn to_protognosis(hypothesis: &UnifiedHypothesis) -> ProtognosisHypothesis {
    let mut metadata = hypothesis.metadata.clone();
    metadata.insert("title".to_string(), Value::from(hypothesis.title.clone()));
    metadata.insert(
        "description".to_string(),
        Value::from(hypothesis.description.clone()),
    );
    metadata.insert(
        "generation_strategy".to_string(),
        Value::from(hypothesis.generation_strategy.clone()),
    );
    for (key, text) in HALLMARK_SCORE_KEYS.iter().zip([
        &hypothesis.hallmarks.testability,
        &hypothesis.hallmarks.specificity,
        &hypothesis.hallmarks.grounded_knowledge,
        &hypothesis.hallmarks.predictive_power,
        &hypothesis.hallmarks.parsimony,
    ]) {
        metadata.insert((*key).to_string(), pack_score(text));
    }
    metadata.insert("conversion_timestamp".to_string(), Value::from(now_epoch()));

    let agent_id = hypothesis
        .metadata
        .get("protognosis_agent_id")
        .and_then(Value::as_str)
        .unwrap_or("jnana_converter")
        .to_string();

    ProtognosisHypothesis {
        hypothesis_id: hypothesis.hypothesis_id.clone(),
        agent_id,
        content: hypothesis.content.clone(),
        summary: hypothesis.description.clone(),
        metadata,
        created_at: hypothesis.created_at,
        updated_at: hypothesis.updated_at,
        version: hypothesis.version,
        parent_id: hypothesis.parent_id.clone(),
        children_ids: hypothesis.children_ids.clone(),
        evaluation_scores: hypothesis.evaluation_scores.clone(),
        tournament_record: hypothesis.tournament_record.clone(),
    }
}

fn render_score(score: f64) -> String {
    format!("{score:.1}")
}

/// Hallmark text that still reads as a number goes back as one; free text
/// is carried through verbatim.
fn pack_score(text: &str) -> Value {
    match text.trim().parse::<f64>() {
        Ok(score) => Value::from(score),
        Err(_) => Value::from(text.to_string()),
    }
}
