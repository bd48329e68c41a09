// src/hypothesis/mod.rs
// Unified hypothesis record: canonical data + mutation invariants
//
// The record is the one representation shared by the interactive refinement
// tool, the multi-agent engine, and the biomedical verification service.
// All mutation goes through the methods below; producers never overwrite
// fields directly, which is what keeps versioning and history consistent.

pub mod types;

pub use types::{
    AgentContribution, BiomniVerification, EvidenceStrength, FeedbackEntry, FeedbackKind,
    HypothesisType, MatchRecord, Reference, ScientificHallmarks, TournamentRecord,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::JnanaError;
use crate::utils::{iso_now, now_epoch};

/// Canonical, versioned representation of one research hypothesis.
///
/// Field names mirror the jnana-1.0 session envelope one-for-one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifiedHypothesis {
    // Core identification
    pub hypothesis_id: String,

    // Content, synchronized at construction time
    pub title: String,
    pub content: String,
    pub description: String,
    pub experimental_validation: String,

    // Timestamps
    pub created_at: f64,
    pub updated_at: f64,
    pub generation_timestamp: String,

    // Version tracking; version_string is always "1.<version-1>"
    pub version: u32,
    pub version_string: String,
    pub hypothesis_type: HypothesisType,

    // Hierarchy (weak references, no ownership)
    pub parent_id: Option<String>,
    pub children_ids: Vec<String>,
    pub hypothesis_number: u32,

    // Scientific evaluation
    pub hallmarks: ScientificHallmarks,
    pub evaluation_scores: BTreeMap<String, f64>,
    pub references: Vec<Reference>,

    // Interactive refinement
    pub feedback_history: Vec<FeedbackEntry>,
    pub notes: String,
    pub improvements_made: String,
    pub user_feedback: String,

    // Multi-agent engine
    pub tournament_record: TournamentRecord,
    pub agent_contributions: Vec<AgentContribution>,
    pub generation_strategy: String,

    // Biomedical verification
    pub biomni_verification: Option<BiomniVerification>,
    pub is_biomedical: bool,
    pub biomedical_domains: Vec<String>,

    // Open provenance bag; no component other than a key's writer should
    // assume that key is stable
    pub metadata: Map<String, Value>,
    pub tags: Vec<String>,
}

impl Default for UnifiedHypothesis {
    fn default() -> Self {
        let now = now_epoch();
        Self {
            hypothesis_id: Uuid::new_v4().to_string(),
            title: String::new(),
            content: String::new(),
            description: String::new(),
            experimental_validation: String::new(),
            created_at: now,
            updated_at: now,
            generation_timestamp: iso_now(),
            version: 1,
            version_string: "1.0".to_string(),
            hypothesis_type: HypothesisType::Original,
            parent_id: None,
            children_ids: Vec::new(),
            hypothesis_number: 1,
            hallmarks: ScientificHallmarks::default(),
            evaluation_scores: BTreeMap::new(),
            references: Vec::new(),
            feedback_history: Vec::new(),
            notes: String::new(),
            improvements_made: String::new(),
            user_feedback: String::new(),
            tournament_record: TournamentRecord::default(),
            agent_contributions: Vec::new(),
            generation_strategy: String::new(),
            biomni_verification: None,
            is_biomedical: false,
            biomedical_domains: Vec::new(),
            metadata: Map::new(),
            tags: Vec::new(),
        }
    }
}

impl UnifiedHypothesis {
    /// Create a fresh record with a new id and synchronized text fields.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let mut hypothesis = Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        };
        hypothesis.synchronize_text();
        hypothesis
    }

    /// Set the detailed description, re-running the construction-time
    /// content/description synchronization.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self.synchronize_text();
        self
    }

    /// Keep `content` and `description` in step: whichever is non-empty
    /// propagates to the other. Construction-time only; later edits to one
    /// field do not flow to its pair.
    pub(crate) fn synchronize_text(&mut self) {
        if !self.content.is_empty() && self.description.is_empty() {
            self.description = self.content.clone();
        } else if !self.description.is_empty() && self.content.is_empty() {
            self.content = self.description.clone();
        }
    }

    /// Advance `updated_at`, never letting it move backwards.
    fn touch(&mut self) {
        self.updated_at = now_epoch().max(self.updated_at);
    }

    // ========================================================================
    // Mutation operations
    // ========================================================================

    /// Record one feedback entry, bumping the version exactly once.
    /// The entry's before/after strings bracket the version transition.
    pub fn add_feedback(&mut self, feedback: &str, user_id: Option<&str>, kind: FeedbackKind) {
        let version_before = self.version_string.clone();
        self.increment_version();

        self.feedback_history.push(FeedbackEntry {
            feedback: feedback.to_string(),
            timestamp: iso_now(),
            version_before,
            version_after: self.version_string.clone(),
            user_id: user_id.map(str::to_string),
            feedback_type: kind,
        });
        self.user_feedback = feedback.to_string();
        self.touch();
    }

    /// Bump the version counter and recompute the display string.
    /// This is the only place `version_string` changes.
    pub fn increment_version(&mut self) {
        self.version += 1;
        self.version_string = format!("1.{}", self.version - 1);
        self.touch();
    }

    /// Append one agent contribution; prior entries are never mutated.
    pub fn add_agent_contribution(
        &mut self,
        agent_id: &str,
        agent_type: &str,
        contribution_type: &str,
        details: Option<Map<String, Value>>,
    ) {
        self.agent_contributions.push(AgentContribution {
            agent_id: agent_id.to_string(),
            agent_type: agent_type.to_string(),
            contribution_type: contribution_type.to_string(),
            timestamp: iso_now(),
            details: details.unwrap_or_default(),
        });
        self.touch();
    }

    /// Record the outcome of one tournament match.
    /// Keeps wins + losses equal to the match list length.
    pub fn update_tournament_record(
        &mut self,
        won: bool,
        opponent_id: &str,
        details: Option<Map<String, Value>>,
    ) {
        if won {
            self.tournament_record.wins += 1;
        } else {
            self.tournament_record.losses += 1;
        }

        let timestamp = iso_now();
        self.tournament_record.matches.push(MatchRecord {
            opponent_id: opponent_id.to_string(),
            won,
            timestamp: timestamp.clone(),
            details: details.unwrap_or_default(),
        });
        self.tournament_record.last_match_timestamp = Some(timestamp);
        self.touch();
    }

    /// Append a scientific reference. An empty citation is rejected.
    pub fn add_reference(
        &mut self,
        citation: &str,
        annotation: &str,
        url: Option<&str>,
        doi: Option<&str>,
    ) -> Result<(), JnanaError> {
        if citation.trim().is_empty() {
            return Err(JnanaError::Validation(
                "reference citation must not be empty".to_string(),
            ));
        }

        self.references.push(Reference {
            citation: citation.to_string(),
            annotation: annotation.to_string(),
            url: url.map(str::to_string),
            doi: doi.map(str::to_string),
            relevance_score: None,
        });
        self.touch();
        Ok(())
    }

    /// Attach a biomedical verification, replacing any previous one.
    ///
    /// The domain set grows idempotently (no duplicate tags) and headline
    /// results are mirrored into `metadata` for quick external inspection.
    pub fn set_biomni_verification(&mut self, verification: BiomniVerification) {
        if !self
            .biomedical_domains
            .contains(&verification.verification_type)
        {
            self.biomedical_domains
                .push(verification.verification_type.clone());
        }

        self.metadata
            .insert("biomni_verified".to_string(), Value::Bool(true));
        self.metadata.insert(
            "biomni_confidence".to_string(),
            Value::from(verification.confidence_score),
        );
        self.metadata.insert(
            "biomni_plausible".to_string(),
            Value::Bool(verification.is_biologically_plausible),
        );

        self.is_biomedical = true;
        self.biomni_verification = Some(verification);
        self.touch();
    }

    // ========================================================================
    // Derived queries
    // ========================================================================

    /// Tournament win rate; 0.0 when no matches have been played.
    pub fn win_rate(&self) -> f64 {
        let total = self.tournament_record.total_matches();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.tournament_record.wins) / f64::from(total)
    }

    /// The most recent feedback entry, if any.
    pub fn latest_feedback(&self) -> Option<&FeedbackEntry> {
        self.feedback_history.last()
    }

    pub fn is_biomni_verified(&self) -> bool {
        self.biomni_verification.is_some()
    }

    /// Confidence score of the live verification; 0.0 when unverified.
    pub fn biomedical_confidence(&self) -> f64 {
        self.biomni_verification
            .as_ref()
            .map(|v| v.confidence_score)
            .unwrap_or(0.0)
    }

    /// Compact summary of the live verification for display surfaces.
    pub fn biomni_summary(&self) -> Map<String, Value> {
        let mut summary = Map::new();
        match &self.biomni_verification {
            None => {
                summary.insert("verified".to_string(), Value::Bool(false));
            }
            Some(v) => {
                summary.insert("verified".to_string(), Value::Bool(true));
                summary.insert(
                    "biologically_plausible".to_string(),
                    Value::Bool(v.is_biologically_plausible),
                );
                summary.insert(
                    "confidence_score".to_string(),
                    Value::from(v.confidence_score),
                );
                summary.insert(
                    "evidence_strength".to_string(),
                    Value::from(v.evidence_strength.as_str()),
                );
                summary.insert(
                    "verification_type".to_string(),
                    Value::from(v.verification_type.clone()),
                );
                summary.insert(
                    "supporting_evidence_count".to_string(),
                    Value::from(v.supporting_evidence.len()),
                );
                summary.insert(
                    "contradicting_evidence_count".to_string(),
                    Value::from(v.contradicting_evidence.len()),
                );
                summary.insert(
                    "suggested_experiments_count".to_string(),
                    Value::from(v.suggested_experiments.len()),
                );
                summary.insert("timestamp".to_string(), Value::from(v.timestamp.clone()));
            }
        }
        summary
    }
}
