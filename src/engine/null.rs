// src/engine/null.rs
// Null-object engine used when no real multi-agent engine is wired in

use anyhow::Result;
use async_trait::async_trait;

use super::{EngineConfig, EvolutionOutcome, MultiAgentEngine};
use crate::error::JnanaError;
use crate::translate::ProtognosisHypothesis;

/// Stand-in engine whose every operation reports unavailable. Substituting
/// this object keeps the adapter free of presence-flag branching.
#[derive(Debug, Default)]
pub struct NullEngine;

impl NullEngine {
    pub fn new() -> Self {
        Self
    }

    fn unavailable<T>(&self, operation: &str) -> Result<T> {
        Err(JnanaError::EngineUnavailable(format!(
            "no multi-agent engine is configured ({operation})"
        ))
        .into())
    }
}

#[async_trait]
impl MultiAgentEngine for NullEngine {
    fn name(&self) -> &'static str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn start(&self, _config: &EngineConfig) -> Result<()> {
        self.unavailable("start")
    }

    async fn stop(&self) -> Result<()> {
        self.unavailable("stop")
    }

    async fn set_research_goal(&self, _goal: &str) -> Result<()> {
        self.unavailable("set_research_goal")
    }

    async fn generate(&self, _count: usize, _strategies: &[String]) -> Result<Vec<String>> {
        self.unavailable("generate")
    }

    async fn wait_for_completion(&self) -> Result<()> {
        self.unavailable("wait_for_completion")
    }

    async fn all_hypotheses(&self) -> Result<Vec<ProtognosisHypothesis>> {
        self.unavailable("all_hypotheses")
    }

    async fn run_tournament(&self, _match_count: usize) -> Result<()> {
        self.unavailable("run_tournament")
    }

    async fn evolve(&self, _hypothesis_id: &str, _feedback: &str) -> Result<EvolutionOutcome> {
        self.unavailable("evolve")
    }

    async fn add_hypothesis(&self, _hypothesis: ProtognosisHypothesis) -> Result<()> {
        self.unavailable("add_hypothesis")
    }

    async fn get_hypothesis(
        &self,
        _hypothesis_id: &str,
    ) -> Result<Option<ProtognosisHypothesis>> {
        self.unavailable("get_hypothesis")
    }
}
