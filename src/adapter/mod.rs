// src/adapter/mod.rs
// Orchestration adapter driving the external multi-agent engine
//
// Owns the engine lifecycle (Uninitialized -> Ready -> Shutdown, with a
// transient busy phase around each long-running call) and translates
// records in and out of the engine's schema. Engine failures never
// propagate: generation falls back to an empty result, tournament and
// evolution fall back to the unchanged input.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::engine::{EngineConfig, MultiAgentEngine, AGENT_ROLES};
use crate::hypothesis::UnifiedHypothesis;
use crate::models::ModelResolver;
use crate::translate::protognosis::{from_protognosis, to_protognosis};
use crate::utils::iso_now;

/// Strategies submitted when the caller does not specify any.
pub const DEFAULT_STRATEGIES: [&str; 2] = ["literature_exploration", "scientific_debate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Ready,
    Shutdown,
}

/// Read-only lifecycle snapshot; never blocks, never mutates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AdapterStatus {
    pub initialized: bool,
    pub engine_available: bool,
    pub max_workers: usize,
    pub timestamp: String,
}

/// Bridge between unified hypothesis records and the multi-agent engine.
///
/// Engine-touching operations take `&mut self`: calls on one adapter are
/// serialized by construction, which is the required single-flight
/// discipline (the engine working set has no internal mutual exclusion).
pub struct ProtognosisAdapter {
    engine: Arc<dyn MultiAgentEngine>,
    resolver: Arc<dyn ModelResolver>,
    storage_path: Option<PathBuf>,
    max_workers: usize,
    state: Lifecycle,
}

impl ProtognosisAdapter {
    pub fn new(
        engine: Arc<dyn MultiAgentEngine>,
        resolver: Arc<dyn ModelResolver>,
        storage_path: Option<PathBuf>,
        max_workers: usize,
    ) -> Self {
        Self {
            engine,
            resolver,
            storage_path,
            max_workers,
            state: Lifecycle::Uninitialized,
        }
    }

    /// Build the engine configuration and start its worker pool.
    ///
    /// Returns whether the adapter is Ready afterwards. Failure is logged
    /// and leaves the lifecycle Uninitialized; it is never raised.
    pub async fn initialize(&mut self) -> bool {
        match self.state {
            Lifecycle::Ready => return true,
            Lifecycle::Shutdown => {
                warn!("Ignoring initialize on a shut-down adapter");
                return false;
            }
            Lifecycle::Uninitialized => {}
        }

        info!("Initializing {} engine", self.engine.name());
        let config = self.build_engine_config();
        match self.engine.start(&config).await {
            Ok(()) => {
                self.state = Lifecycle::Ready;
                info!(
                    "Engine started ({} workers, default model {}/{})",
                    config.max_workers, config.default_model.provider, config.default_model.model
                );
                true
            }
            Err(e) => {
                error!("Failed to initialize engine: {e}");
                false
            }
        }
    }

    /// Generate hypotheses for a research goal.
    ///
    /// Returns an empty sequence on any engine failure; with a non-zero
    /// `count`, an empty result therefore means "generation failed".
    pub async fn generate_hypotheses(
        &mut self,
        research_goal: &str,
        count: usize,
        strategies: Option<&[String]>,
    ) -> Vec<UnifiedHypothesis> {
        if !self.ensure_ready().await {
            return Vec::new();
        }

        let strategies: Vec<String> = match strategies {
            Some(s) => s.to_vec(),
            None => DEFAULT_STRATEGIES.iter().map(|s| s.to_string()).collect(),
        };

        info!(
            "Generating {count} hypotheses for goal: {:.100}",
            research_goal
        );
        match self.generate_inner(research_goal, count, &strategies).await {
            Ok(hypotheses) => {
                info!("Generated {} hypotheses", hypotheses.len());
                hypotheses
            }
            Err(e) => {
                error!("Hypothesis generation failed: {e}");
                Vec::new()
            }
        }
    }

    async fn generate_inner(
        &self,
        research_goal: &str,
        count: usize,
        strategies: &[String],
    ) -> anyhow::Result<Vec<UnifiedHypothesis>> {
        self.engine.set_research_goal(research_goal).await?;
        self.engine.generate(count, strategies).await?;
        self.engine.wait_for_completion().await?;

        let native = self.engine.all_hypotheses().await?;
        Ok(native.into_iter().map(from_protognosis).collect())
    }

    /// Run pairwise tournament ranking over the given records.
    ///
    /// On failure the original input is returned unchanged; callers never
    /// see a partially ranked set.
    pub async fn run_tournament(
        &mut self,
        hypotheses: &[UnifiedHypothesis],
        match_count: usize,
    ) -> Vec<UnifiedHypothesis> {
        if !self.ensure_ready().await {
            return hypotheses.to_vec();
        }

        info!(
            "Running tournament: {match_count} matches over {} hypotheses",
            hypotheses.len()
        );
        match self.tournament_inner(hypotheses, match_count).await {
            Ok(ranked) => {
                info!("Tournament completed");
                ranked
            }
            Err(e) => {
                warn!("Tournament failed, returning input unchanged: {e}");
                hypotheses.to_vec()
            }
        }
    }

    async fn tournament_inner(
        &self,
        hypotheses: &[UnifiedHypothesis],
        match_count: usize,
    ) -> anyhow::Result<Vec<UnifiedHypothesis>> {
        for hypothesis in hypotheses {
            self.engine.add_hypothesis(to_protognosis(hypothesis)).await?;
        }

        self.engine.run_tournament(match_count).await?;
        self.engine.wait_for_completion().await?;

        let native = self.engine.all_hypotheses().await?;
        Ok(native.into_iter().map(from_protognosis).collect())
    }

    /// Evolve one hypothesis, keyed by feedback text.
    ///
    /// Any failure (including the engine reporting success with an
    /// identifier its store cannot resolve) returns the original record
    /// unchanged.
    pub async fn evolve_hypothesis(
        &mut self,
        hypothesis: &UnifiedHypothesis,
        feedback: &str,
    ) -> UnifiedHypothesis {
        if !self.ensure_ready().await {
            return hypothesis.clone();
        }

        match self.evolve_inner(hypothesis, feedback).await {
            Ok(Some(evolved)) => evolved,
            Ok(None) => {
                warn!(
                    "Evolution of {} produced an unresolvable result, keeping original",
                    hypothesis.hypothesis_id
                );
                hypothesis.clone()
            }
            Err(e) => {
                warn!(
                    "Evolution of {} failed, keeping original: {e}",
                    hypothesis.hypothesis_id
                );
                hypothesis.clone()
            }
        }
    }

    async fn evolve_inner(
        &self,
        hypothesis: &UnifiedHypothesis,
        feedback: &str,
    ) -> anyhow::Result<Option<UnifiedHypothesis>> {
        self.engine.add_hypothesis(to_protognosis(hypothesis)).await?;

        let outcome = self
            .engine
            .evolve(&hypothesis.hypothesis_id, feedback)
            .await?;
        let Some(evolved_id) = outcome.evolved_id else {
            return Ok(None);
        };

        Ok(self
            .engine
            .get_hypothesis(&evolved_id)
            .await?
            .map(from_protognosis))
    }

    /// Stop the engine's workers. Only effective from Ready; calling again
    /// is a no-op.
    pub async fn shutdown(&mut self) {
        if self.state != Lifecycle::Ready {
            return;
        }

        info!("Shutting down {} engine", self.engine.name());
        if let Err(e) = self.engine.stop().await {
            warn!("Error stopping engine: {e}");
        }
        self.state = Lifecycle::Shutdown;
    }

    /// Read-only lifecycle snapshot.
    pub fn status(&self) -> AdapterStatus {
        AdapterStatus {
            initialized: self.state == Lifecycle::Ready,
            engine_available: self.engine.is_available(),
            max_workers: self.max_workers,
            timestamp: iso_now(),
        }
    }

    pub fn storage_path(&self) -> Option<&PathBuf> {
        self.storage_path.as_ref()
    }

    async fn ensure_ready(&mut self) -> bool {
        match self.state {
            Lifecycle::Ready => true,
            Lifecycle::Uninitialized => self.initialize().await,
            Lifecycle::Shutdown => {
                warn!("Adapter is shut down; refusing engine operation");
                false
            }
        }
    }

    fn build_engine_config(&self) -> EngineConfig {
        let default_model = self.resolver.default_config();
        let mut agent_models = BTreeMap::new();
        for role in AGENT_ROLES {
            agent_models.insert(role.to_string(), self.resolver.model_for_agent(role));
        }

        EngineConfig {
            default_model,
            agent_models,
            max_workers: self.max_workers,
            storage_path: self.storage_path.clone(),
        }
    }
}
