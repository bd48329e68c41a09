// src/hypothesis/types.rs
// Component types of the unified hypothesis record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provenance of a hypothesis record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisType {
    #[default]
    Original,
    Improvement,
    NewAlternative,
    ProtognosisGenerated,
}

impl HypothesisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HypothesisType::Original => "original",
            HypothesisType::Improvement => "improvement",
            HypothesisType::NewAlternative => "new_alternative",
            HypothesisType::ProtognosisGenerated => "protognosis_generated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "original" => Some(HypothesisType::Original),
            "improvement" => Some(HypothesisType::Improvement),
            "new_alternative" => Some(HypothesisType::NewAlternative),
            "protognosis_generated" => Some(HypothesisType::ProtognosisGenerated),
            _ => None,
        }
    }
}

/// Who authored a feedback entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    #[default]
    User,
    Agent,
    System,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::User => "user",
            FeedbackKind::Agent => "agent",
            FeedbackKind::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(FeedbackKind::User),
            "agent" => Some(FeedbackKind::Agent),
            "system" => Some(FeedbackKind::System),
            _ => None,
        }
    }
}

/// One step in the hypothesis refinement history.
/// `version_before`/`version_after` bracket the version transition the
/// feedback caused, in display form ("1.0" -> "1.1").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub feedback: String,
    pub timestamp: String,
    pub version_before: String,
    pub version_after: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub feedback_type: FeedbackKind,
}

/// A scientific reference attached to a hypothesis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reference {
    pub citation: String,
    #[serde(default)]
    pub annotation: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

/// Scientific evaluation criteria from the interactive refinement tool.
/// Free text by default; multi-agent imports render numeric scores here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScientificHallmarks {
    #[serde(default)]
    pub testability: String,
    #[serde(default)]
    pub specificity: String,
    #[serde(default)]
    pub grounded_knowledge: String,
    #[serde(default)]
    pub predictive_power: String,
    #[serde(default)]
    pub parsimony: String,
}

/// One pairwise tournament match.
/// Defaults keep foreign match entries of unknown shape decodable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub opponent_id: String,
    #[serde(default)]
    pub won: bool,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub details: Map<String, Value>,
}

/// Tournament performance tracking from the multi-agent engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TournamentRecord {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub elo_rating: Option<f64>,
    #[serde(default)]
    pub last_match_timestamp: Option<String>,
}

impl TournamentRecord {
    pub fn total_matches(&self) -> u32 {
        self.wins + self.losses
    }
}

/// A single contribution made by one agent to a hypothesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContribution {
    pub agent_id: String,
    pub agent_type: String,
    pub contribution_type: String,
    pub timestamp: String,
    #[serde(default)]
    pub details: Map<String, Value>,
}

/// Strength of the evidence behind a biomedical verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStrength {
    Weak,
    Moderate,
    Strong,
}

impl EvidenceStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStrength::Weak => "weak",
            EvidenceStrength::Moderate => "moderate",
            EvidenceStrength::Strong => "strong",
        }
    }
}

/// Biomedical plausibility assessment produced by the verification service.
/// At most one verification is live per hypothesis; attaching a new one
/// replaces the previous assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomniVerification {
    pub verification_id: String,
    pub verification_type: String,
    pub is_biologically_plausible: bool,
    pub confidence_score: f64,
    pub evidence_strength: EvidenceStrength,
    #[serde(default)]
    pub supporting_evidence: Vec<String>,
    #[serde(default)]
    pub contradicting_evidence: Vec<String>,
    #[serde(default)]
    pub suggested_experiments: Vec<String>,
    #[serde(default)]
    pub related_pathways: Vec<String>,
    #[serde(default)]
    pub molecular_mechanisms: Vec<String>,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default)]
    pub execution_time: f64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub biomni_response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypothesis_type_roundtrip() {
        for t in [
            HypothesisType::Original,
            HypothesisType::Improvement,
            HypothesisType::NewAlternative,
            HypothesisType::ProtognosisGenerated,
        ] {
            assert_eq!(HypothesisType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(HypothesisType::from_str("unknown"), None);
    }

    #[test]
    fn match_record_decodes_foreign_shape() {
        let raw = serde_json::json!({"winner": "h-2", "round": 3});
        let decoded: MatchRecord = serde_json::from_value(raw).unwrap();
        assert!(decoded.opponent_id.is_empty());
        assert!(!decoded.won);
    }
}
