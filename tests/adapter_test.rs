// tests/adapter_test.rs
// Orchestration adapter lifecycle and failure-fallback contracts

use std::sync::Arc;

use jnana::adapter::ProtognosisAdapter;
use jnana::engine::mock::MockFailures;
use jnana::engine::{MockEngine, MultiAgentEngine, NullEngine};
use jnana::hypothesis::{HypothesisType, UnifiedHypothesis};
use jnana::models::{ModelConfig, ModelResolver};

fn adapter_with(engine: Arc<dyn MultiAgentEngine>) -> ProtognosisAdapter {
    let resolver: Arc<dyn ModelResolver> = Arc::new(ModelConfig::default());
    ProtognosisAdapter::new(engine, resolver, None, 4)
}

#[tokio::test]
async fn generate_produces_unified_records() {
    let mut adapter = adapter_with(Arc::new(MockEngine::new()));

    let hypotheses = adapter
        .generate_hypotheses("Why does caloric restriction extend lifespan?", 4, None)
        .await;

    assert_eq!(hypotheses.len(), 4);
    for h in &hypotheses {
        assert_eq!(h.hypothesis_type, HypothesisType::ProtognosisGenerated);
        assert!(h.content.contains("caloric restriction"));
        assert!(!h.title.is_empty());
        // Default strategies rotate over the generated set
        assert!(!h.generation_strategy.is_empty());
    }

    let status = adapter.status();
    assert!(status.initialized);
    assert!(status.engine_available);
    assert_eq!(status.max_workers, 4);
}

#[tokio::test]
async fn generate_failure_yields_empty_result() {
    let engine = Arc::new(MockEngine::with_failures(MockFailures {
        generation: true,
        ..MockFailures::default()
    }));
    let mut adapter = adapter_with(engine);

    let hypotheses = adapter.generate_hypotheses("goal", 3, None).await;
    assert!(hypotheses.is_empty());
}

#[tokio::test]
async fn null_engine_never_initializes() {
    let mut adapter = adapter_with(Arc::new(NullEngine::new()));

    assert!(!adapter.initialize().await);
    assert!(adapter.generate_hypotheses("goal", 2, None).await.is_empty());

    let status = adapter.status();
    assert!(!status.initialized);
    assert!(!status.engine_available);
}

#[tokio::test]
async fn tournament_updates_records() {
    let mut adapter = adapter_with(Arc::new(MockEngine::new()));

    let input = vec![
        UnifiedHypothesis::new("A", "Short body."),
        UnifiedHypothesis::new("B", "A noticeably longer hypothesis body wins matches."),
    ];
    let ranked = adapter.run_tournament(&input, 4).await;

    assert_eq!(ranked.len(), 2);
    let total_matches: u32 = ranked
        .iter()
        .map(|h| h.tournament_record.total_matches())
        .sum();
    assert_eq!(total_matches, 8);
    assert!(ranked.iter().any(|h| h.tournament_record.elo_rating.is_some()));
    // Identity survives the round trip through the engine
    assert!(input
        .iter()
        .all(|h| ranked.iter().any(|r| r.hypothesis_id == h.hypothesis_id)));
}

#[tokio::test]
async fn tournament_failure_returns_input_unchanged() {
    let engine = Arc::new(MockEngine::with_failures(MockFailures {
        tournament: true,
        ..MockFailures::default()
    }));
    let mut adapter = adapter_with(engine);

    let mut input = vec![
        UnifiedHypothesis::new("A", "First body."),
        UnifiedHypothesis::new("B", "Second body."),
    ];
    input[0].update_tournament_record(true, "prior-opponent", None);

    let out = adapter.run_tournament(&input, 10).await;

    assert_eq!(out.len(), input.len());
    for (before, after) in input.iter().zip(&out) {
        assert_eq!(after.hypothesis_id, before.hypothesis_id);
        assert_eq!(after.tournament_record.wins, before.tournament_record.wins);
        assert_eq!(
            after.tournament_record.matches.len(),
            before.tournament_record.matches.len()
        );
        assert_eq!(after.version_string, before.version_string);
    }
}

#[tokio::test]
async fn evolve_returns_refined_child() {
    let mut adapter = adapter_with(Arc::new(MockEngine::new()));

    let original = UnifiedHypothesis::new("A", "Original body.");
    let evolved = adapter
        .evolve_hypothesis(&original, "account for confounders")
        .await;

    assert_ne!(evolved.hypothesis_id, original.hypothesis_id);
    assert_eq!(evolved.parent_id.as_deref(), Some(original.hypothesis_id.as_str()));
    assert!(evolved.content.contains("account for confounders"));
}

#[tokio::test]
async fn evolve_with_unresolvable_result_keeps_original() {
    let engine = Arc::new(MockEngine::with_failures(MockFailures {
        unresolvable_evolution: true,
        ..MockFailures::default()
    }));
    let mut adapter = adapter_with(engine);

    let original = UnifiedHypothesis::new("A", "Original body.");
    let out = adapter.evolve_hypothesis(&original, "feedback").await;

    assert_eq!(out.hypothesis_id, original.hypothesis_id);
    assert_eq!(out.content, original.content);
}

#[tokio::test]
async fn evolve_error_keeps_original() {
    let engine = Arc::new(MockEngine::with_failures(MockFailures {
        evolution: true,
        ..MockFailures::default()
    }));
    let mut adapter = adapter_with(engine);

    let original = UnifiedHypothesis::new("A", "Original body.");
    let out = adapter.evolve_hypothesis(&original, "feedback").await;
    assert_eq!(out.hypothesis_id, original.hypothesis_id);
}

#[tokio::test]
async fn shutdown_is_idempotent_and_final() {
    let mut adapter = adapter_with(Arc::new(MockEngine::new()));

    assert!(adapter.initialize().await);
    adapter.shutdown().await;
    adapter.shutdown().await; // no-op

    assert!(!adapter.status().initialized);
    // A shut-down adapter refuses further engine work
    assert!(adapter.generate_hypotheses("goal", 1, None).await.is_empty());
    assert!(!adapter.initialize().await);
}
