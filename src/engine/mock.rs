// src/engine/mock.rs
// Deterministic in-memory engine implementing the MultiAgentEngine contract
//
// Behaves like a tiny, synchronous ProtoGnosis: generation seeds hypotheses
// from the research goal, tournaments play deterministic round-robin
// matches with Elo updates, evolution appends a refined child. Failure
// switches let adapter tests exercise every fallback path.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EngineConfig, EvolutionOutcome, MultiAgentEngine};
use crate::hypothesis::MatchRecord;
use crate::translate::ProtognosisHypothesis;
use crate::utils::{iso_now, now_epoch};

const BASE_ELO: f64 = 1200.0;
const ELO_STEP: f64 = 16.0;

/// Which operations should fail, for exercising adapter fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFailures {
    pub generation: bool,
    pub tournament: bool,
    pub evolution: bool,
    /// Evolution reports success but the resulting id resolves to nothing.
    pub unresolvable_evolution: bool,
}

#[derive(Debug, Default)]
struct MockState {
    started: bool,
    goal: String,
    workers: usize,
    hypotheses: Vec<ProtognosisHypothesis>,
}

#[derive(Debug, Default)]
pub struct MockEngine {
    failures: MockFailures,
    state: RwLock<MockState>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failures(failures: MockFailures) -> Self {
        Self {
            failures,
            state: RwLock::new(MockState::default()),
        }
    }

    /// Number of hypotheses currently in the working set.
    pub async fn hypothesis_count(&self) -> usize {
        self.state.read().await.hypotheses.len()
    }
}

#[async_trait]
impl MultiAgentEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn start(&self, config: &EngineConfig) -> Result<()> {
        let mut state = self.state.write().await;
        state.started = true;
        state.workers = config.max_workers.max(1);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.state.write().await.started = false;
        Ok(())
    }

    async fn set_research_goal(&self, goal: &str) -> Result<()> {
        self.state.write().await.goal = goal.to_string();
        Ok(())
    }

    async fn generate(&self, count: usize, strategies: &[String]) -> Result<Vec<String>> {
        if self.failures.generation {
            bail!("mock generation failure");
        }

        let mut state = self.state.write().await;
        if !state.started {
            bail!("engine not started");
        }

        let goal = state.goal.clone();
        let mut ids = Vec::with_capacity(count);
        for index in 0..count {
            let strategy = if strategies.is_empty() {
                "unspecified"
            } else {
                strategies[index % strategies.len()].as_str()
            };
            let id = Uuid::new_v4().to_string();

            let mut hypothesis = ProtognosisHypothesis {
                hypothesis_id: id.clone(),
                agent_id: format!("generation-{}", index % state.workers.max(1)),
                content: format!("Hypothesis {} addressing: {goal}", index + 1),
                created_at: now_epoch(),
                updated_at: now_epoch(),
                version: 1,
                ..ProtognosisHypothesis::default()
            };
            hypothesis
                .metadata
                .insert("strategy".to_string(), Value::from(strategy));
            state.hypotheses.push(hypothesis);
            ids.push(id);
        }
        Ok(ids)
    }

    async fn wait_for_completion(&self) -> Result<()> {
        // The mock works synchronously; there is never queued work.
        Ok(())
    }

    async fn all_hypotheses(&self) -> Result<Vec<ProtognosisHypothesis>> {
        Ok(self.state.read().await.hypotheses.clone())
    }

    async fn run_tournament(&self, match_count: usize) -> Result<()> {
        if self.failures.tournament {
            bail!("mock tournament failure");
        }

        let mut state = self.state.write().await;
        let n = state.hypotheses.len();
        if n < 2 {
            return Ok(());
        }

        for round in 0..match_count {
            let a = round % n;
            let b = (round + 1) % n;
            // Longer content wins; deterministic and content-sensitive.
            let a_wins =
                state.hypotheses[a].content.len() >= state.hypotheses[b].content.len();
            let (winner, loser) = if a_wins { (a, b) } else { (b, a) };

            let loser_id = state.hypotheses[loser].hypothesis_id.clone();
            let winner_id = state.hypotheses[winner].hypothesis_id.clone();
            let timestamp = iso_now();

            let record = &mut state.hypotheses[winner].tournament_record;
            record.wins += 1;
            record.elo_rating = Some(record.elo_rating.unwrap_or(BASE_ELO) + ELO_STEP);
            record.last_match_timestamp = Some(timestamp.clone());
            record.matches.push(MatchRecord {
                opponent_id: loser_id,
                won: true,
                timestamp: timestamp.clone(),
                ..MatchRecord::default()
            });

            let record = &mut state.hypotheses[loser].tournament_record;
            record.losses += 1;
            record.elo_rating = Some(record.elo_rating.unwrap_or(BASE_ELO) - ELO_STEP);
            record.last_match_timestamp = Some(timestamp.clone());
            record.matches.push(MatchRecord {
                opponent_id: winner_id,
                won: false,
                timestamp,
                ..MatchRecord::default()
            });
        }
        Ok(())
    }

    async fn evolve(&self, hypothesis_id: &str, feedback: &str) -> Result<EvolutionOutcome> {
        if self.failures.evolution {
            bail!("mock evolution failure");
        }
        if self.failures.unresolvable_evolution {
            return Ok(EvolutionOutcome {
                evolved_id: Some(format!("missing-{}", Uuid::new_v4())),
            });
        }

        let mut state = self.state.write().await;
        let Some(parent) = state
            .hypotheses
            .iter()
            .find(|h| h.hypothesis_id == hypothesis_id)
            .cloned()
        else {
            return Ok(EvolutionOutcome::default());
        };

        let child_id = Uuid::new_v4().to_string();
        let mut child = parent.clone();
        child.hypothesis_id = child_id.clone();
        child.agent_id = "evolution-0".to_string();
        child.parent_id = Some(parent.hypothesis_id.clone());
        child.children_ids = Vec::new();
        child.content = format!("{}\n\nRefined per feedback: {feedback}", parent.content);
        child.created_at = now_epoch();
        child.updated_at = child.created_at;
        child.tournament_record = Default::default();

        if let Some(parent_entry) = state
            .hypotheses
            .iter_mut()
            .find(|h| h.hypothesis_id == hypothesis_id)
        {
            parent_entry.children_ids.push(child_id.clone());
        }
        state.hypotheses.push(child);

        Ok(EvolutionOutcome {
            evolved_id: Some(child_id),
        })
    }

    async fn add_hypothesis(&self, hypothesis: ProtognosisHypothesis) -> Result<()> {
        let mut state = self.state.write().await;
        match state
            .hypotheses
            .iter_mut()
            .find(|h| h.hypothesis_id == hypothesis.hypothesis_id)
        {
            Some(existing) => *existing = hypothesis,
            None => state.hypotheses.push(hypothesis),
        }
        Ok(())
    }

    async fn get_hypothesis(
        &self,
        hypothesis_id: &str,
    ) -> Result<Option<ProtognosisHypothesis>> {
        Ok(self
            .state
            .read()
            .await
            .hypotheses
            .iter()
            .find(|h| h.hypothesis_id == hypothesis_id)
            .cloned())
    }
}
