// src/translate/wisteria.rs
// Interactive-schema (Wisteria) translation
//
// The interactive tool nests hallmarks and feedback under hypothesis-local
// keys and encodes the version as a dotted display string ("1.1"), not an
// integer. Decoding fails soft wherever the original data is sloppy; only a
// value that is not a hypothesis object at all raises a TranslationError.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::error::JnanaError;
use crate::hypothesis::{
    FeedbackEntry, FeedbackKind, HypothesisType, Reference, ScientificHallmarks,
    UnifiedHypothesis,
};
use crate::utils::{iso_now, now_epoch, parse_iso_timestamp};

/// One hypothesis as the interactive tool stores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WisteriaHypothesis {
    pub hypothesis_id: String,
    pub title: String,
    pub description: String,
    pub experimental_validation: String,
    pub hallmarks: ScientificHallmarks,
    /// Reference entries are objects in recent sessions, bare citation
    /// strings in older ones.
    pub references: Vec<Value>,
    pub feedback_history: Vec<WisteriaFeedback>,
    pub version: String,
    #[serde(rename = "type")]
    pub hypothesis_type: String,
    pub hypothesis_number: u32,
    pub generation_timestamp: String,
    pub notes: String,
    pub improvements_made: String,
    pub user_feedback: String,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WisteriaFeedback {
    pub feedback: String,
    pub timestamp: String,
    pub version_before: String,
    pub version_after: String,
    pub user_id: Option<String>,
    pub feedback_type: String,
}

impl Default for WisteriaFeedback {
    fn default() -> Self {
        Self {
            feedback: String::new(),
            timestamp: String::new(),
            version_before: "1.0".to_string(),
            version_after: "1.1".to_string(),
            user_id: None,
            feedback_type: "user".to_string(),
        }
    }
}

/// Decode a raw session item into a unified record.
pub fn decode(value: &Value) -> Result<UnifiedHypothesis, JnanaError> {
    let wisteria: WisteriaHypothesis = serde_json::from_value(value.clone())
        .map_err(|e| JnanaError::Translation(format!("interactive hypothesis: {e}")))?;
    Ok(from_wisteria(wisteria))
}

/// Convert an interactive-schema hypothesis into the unified record.
pub fn from_wisteria(wisteria: WisteriaHypothesis) -> UnifiedHypothesis {
    let hypothesis_id = if wisteria.hypothesis_id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        wisteria.hypothesis_id
    };

    let (version, version_string) = parse_version_string(&wisteria.version);

    let generation_timestamp = if wisteria.generation_timestamp.is_empty() {
        iso_now()
    } else {
        wisteria.generation_timestamp
    };
    let created_at = parse_iso_timestamp(&generation_timestamp).unwrap_or_else(now_epoch);

    let references = wisteria
        .references
        .iter()
        .filter_map(decode_reference)
        .collect();

    let feedback_history = wisteria
        .feedback_history
        .into_iter()
        .map(|fb| FeedbackEntry {
            feedback: fb.feedback,
            timestamp: if fb.timestamp.is_empty() {
                iso_now()
            } else {
                fb.timestamp
            },
            version_before: fb.version_before,
            version_after: fb.version_after,
            user_id: fb.user_id,
            feedback_type: FeedbackKind::from_str(&fb.feedback_type).unwrap_or_default(),
        })
        .collect();

    let mut unified = UnifiedHypothesis {
        hypothesis_id,
        title: wisteria.title,
        content: wisteria.description.clone(),
        description: wisteria.description,
        experimental_validation: wisteria.experimental_validation,
        created_at,
        updated_at: created_at,
        generation_timestamp,
        version,
        version_string,
        hypothesis_type: HypothesisType::from_str(&wisteria.hypothesis_type).unwrap_or_default(),
        hypothesis_number: wisteria.hypothesis_number.max(1),
        hallmarks: wisteria.hallmarks,
        references,
        feedback_history,
        notes: wisteria.notes,
        improvements_made: wisteria.improvements_made,
        user_feedback: wisteria.user_feedback,
        metadata: wisteria.metadata,
        ..UnifiedHypothesis::default()
    };
    unified.synchronize_text();
    unified
}

/// Convert a unified record back into the interactive schema.
///
/// The version is re-rendered as the stored display string, NOT re-derived
/// from the integer counter; the two representations are not perfectly
/// invertible and this direction is intentionally lossy.
pub fn to_wisteria(hypothesis: &UnifiedHypothesis) -> WisteriaHypothesis {
    WisteriaHypothesis {
        hypothesis_id: hypothesis.hypothesis_id.clone(),
        title: hypothesis.title.clone(),
        description: hypothesis.description.clone(),
        experimental_validation: hypothesis.experimental_validation.clone(),
        hallmarks: hypothesis.hallmarks.clone(),
        references: hypothesis
            .references
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect(),
        feedback_history: hypothesis
            .feedback_history
            .iter()
            .map(|fb| WisteriaFeedback {
                feedback: fb.feedback.clone(),
                timestamp: fb.timestamp.clone(),
                version_before: fb.version_before.clone(),
                version_after: fb.version_after.clone(),
                user_id: fb.user_id.clone(),
                feedback_type: fb.feedback_type.as_str().to_string(),
            })
            .collect(),
        version: hypothesis.version_string.clone(),
        hypothesis_type: hypothesis.hypothesis_type.as_str().to_string(),
        hypothesis_number: hypothesis.hypothesis_number,
        generation_timestamp: hypothesis.generation_timestamp.clone(),
        notes: hypothesis.notes.clone(),
        improvements_made: hypothesis.improvements_made.clone(),
        user_feedback: hypothesis.user_feedback.clone(),
        metadata: hypothesis.metadata.clone(),
    }
}

/// Decode the interactive dotted version string.
///
/// Split on the first '.'; a minor part maps to `minor + 1`, a bare number
/// maps to itself. Any parse failure resets to version 1 / display "1.0"
/// instead of raising.
pub fn parse_version_string(version: &str) -> (u32, String) {
    let parsed = match version.split_once('.') {
        Some((_, minor)) if !minor.is_empty() => minor.parse::<u32>().ok().map(|m| m + 1),
        Some(_) => None,
        None => version.parse::<u32>().ok(),
    };

    match parsed {
        Some(v) if v >= 1 => (v, version.to_string()),
        _ => (1, "1.0".to_string()),
    }
}

fn decode_reference(value: &Value) -> Option<Reference> {
    match value {
        Value::String(citation) => Some(Reference {
            citation: citation.clone(),
            ..Reference::default()
        }),
        Value::Object(_) => match serde_json::from_value::<Reference>(value.clone()) {
            Ok(reference) => Some(reference),
            Err(e) => {
                warn!("Skipping malformed reference entry: {e}");
                None
            }
        },
        _ => {
            warn!("Skipping reference entry of unexpected shape");
            None
        }
    }
}
