// src/engine/mod.rs
// Capability interface for the external multi-agent engine
//
// The engine runs its own worker pool; this layer only defines the contract
// the orchestration adapter drives. One implementation is selected at
// startup: the real engine binding, or NullEngine when none is available.

pub mod mock;
pub mod null;

pub use mock::MockEngine;
pub use null::NullEngine;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::models::ModelConfig;
use crate::translate::ProtognosisHypothesis;

/// Agent roles the engine staffs; each may carry its own model override.
pub const AGENT_ROLES: [&str; 6] = [
    "generation",
    "reflection",
    "ranking",
    "evolution",
    "proximity",
    "meta_review",
];

/// Configuration handed to the engine at startup.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub default_model: ModelConfig,
    pub agent_models: BTreeMap<String, ModelConfig>,
    pub max_workers: usize,
    pub storage_path: Option<PathBuf>,
}

/// Result of one evolution step. The engine may report success with no
/// resolvable identifier; callers must treat that as failure.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOutcome {
    pub evolved_id: Option<String>,
}

/// Contract the orchestration adapter requires of the multi-agent engine.
#[async_trait]
pub trait MultiAgentEngine: Send + Sync {
    /// Engine name for logging/debugging
    fn name(&self) -> &'static str;

    /// Whether a real engine is behind this handle
    fn is_available(&self) -> bool;

    /// Start the engine's worker pool with the given configuration
    async fn start(&self, config: &EngineConfig) -> Result<()>;

    /// Stop the worker pool
    async fn stop(&self) -> Result<()>;

    /// Set the research goal subsequent generations work toward
    async fn set_research_goal(&self, goal: &str) -> Result<()>;

    /// Queue generation of `count` hypotheses; returns their identifiers
    async fn generate(&self, count: usize, strategies: &[String]) -> Result<Vec<String>>;

    /// Block until all queued work has drained
    async fn wait_for_completion(&self) -> Result<()>;

    /// Every hypothesis currently in the engine's working set
    async fn all_hypotheses(&self) -> Result<Vec<ProtognosisHypothesis>>;

    /// Run `match_count` pairwise tournament matches over the working set
    async fn run_tournament(&self, match_count: usize) -> Result<()>;

    /// Evolve one hypothesis, keyed by feedback text
    async fn evolve(&self, hypothesis_id: &str, feedback: &str) -> Result<EvolutionOutcome>;

    /// Inject a hypothesis into the engine's working set
    async fn add_hypothesis(&self, hypothesis: ProtognosisHypothesis) -> Result<()>;

    /// Look up a hypothesis in the working set
    async fn get_hypothesis(&self, hypothesis_id: &str) -> Result<Option<ProtognosisHypothesis>>;
}
