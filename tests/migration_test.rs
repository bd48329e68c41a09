// tests/migration_test.rs
// Batch session migration: fault isolation, envelope round-trip, atomic save

use serde_json::{json, Map, Value};
use tempfile::tempdir;

use jnana::hypothesis::{FeedbackKind, UnifiedHypothesis};
use jnana::migration::{
    load_protognosis_session, load_unified_session, load_wisteria_session,
    save_unified_session, SESSION_FORMAT_VERSION,
};

async fn write_json(path: &std::path::Path, value: &Value) {
    tokio::fs::write(path, serde_json::to_vec_pretty(value).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn wisteria_load_skips_malformed_items() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wisteria_session.json");

    write_json(
        &path,
        &json!({
            "hypotheses": [
                {
                    "title": "Well formed",
                    "description": "A valid hypothesis.",
                    "version": "1.1"
                },
                "this string is not a hypothesis object"
            ]
        }),
    )
    .await;

    let load = load_wisteria_session(&path).await.unwrap();
    assert_eq!(load.hypotheses.len(), 1);
    assert_eq!(load.hypotheses[0].title, "Well formed");
    assert_eq!(load.hypotheses[0].version, 2);
    assert_eq!(load.report.attempted, 2);
    assert_eq!(load.report.skipped(), 1);
    assert_eq!(load.report.success_rate(), 0.5);
}

#[tokio::test]
async fn wisteria_load_accepts_all_three_shapes() {
    let dir = tempdir().unwrap();
    let item = json!({"title": "Shape test", "description": "Body."});

    let envelope = dir.path().join("envelope.json");
    write_json(&envelope, &json!({"hypotheses": [item.clone()]})).await;
    assert_eq!(
        load_wisteria_session(&envelope).await.unwrap().hypotheses.len(),
        1
    );

    let bare_list = dir.path().join("list.json");
    write_json(&bare_list, &json!([item.clone(), item.clone()])).await;
    assert_eq!(
        load_wisteria_session(&bare_list).await.unwrap().hypotheses.len(),
        2
    );

    let single = dir.path().join("single.json");
    write_json(&single, &item).await;
    assert_eq!(
        load_wisteria_session(&single).await.unwrap().hypotheses.len(),
        1
    );
}

#[tokio::test]
async fn protognosis_load_requires_hypotheses_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pg_session.json");

    write_json(&path, &json!({"results": []})).await;
    assert!(load_protognosis_session(&path).await.is_err());

    write_json(
        &path,
        &json!({
            "hypotheses": [
                {"hypothesis_id": "pg-1", "content": "Engine output.", "metadata": {}}
            ]
        }),
    )
    .await;
    let load = load_protognosis_session(&path).await.unwrap();
    assert_eq!(load.hypotheses.len(), 1);
    assert_eq!(load.hypotheses[0].hypothesis_id, "pg-1");
}

#[tokio::test]
async fn missing_session_file_is_fatal() {
    let dir = tempdir().unwrap();
    let err = load_wisteria_session(&dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, jnana::JnanaError::Configuration(_)));
}

#[tokio::test]
async fn unified_session_roundtrip() {
    let dir = tempdir().unwrap();
    // Nested path exercises directory creation on save
    let path = dir.path().join("sessions").join("run-1").join("session.json");

    let mut first = UnifiedHypothesis::new("Alpha", "First hypothesis body.");
    first.add_feedback("sharpen the claim", Some("reviewer-1"), FeedbackKind::User);
    first
        .add_reference("Doe et al. 2024", "method source", None, None)
        .unwrap();
    first.update_tournament_record(true, "beta-id", None);
    let second = UnifiedHypothesis::new("Beta", "Second hypothesis body.");

    let mut metadata = Map::new();
    metadata.insert("research_goal".to_string(), Value::from("test goal"));
    save_unified_session(&[first.clone(), second], &path, Some(metadata))
        .await
        .unwrap();

    // Envelope is self-describing
    let raw: Value =
        serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
    assert_eq!(
        raw.get("format_version").and_then(Value::as_str),
        Some(SESSION_FORMAT_VERSION)
    );
    assert!(raw.get("created_at").is_some());
    assert_eq!(
        raw.pointer("/metadata/research_goal").and_then(Value::as_str),
        Some("test goal")
    );

    // No temp file left behind
    assert!(!dir
        .path()
        .join("sessions")
        .join("run-1")
        .join("session.json.tmp")
        .exists());

    let load = load_unified_session(&path).await.unwrap();
    assert_eq!(load.hypotheses.len(), 2);
    let restored = &load.hypotheses[0];
    assert_eq!(restored.hypothesis_id, first.hypothesis_id);
    assert_eq!(restored.version, 2);
    assert_eq!(restored.version_string, "1.1");
    assert_eq!(restored.feedback_history.len(), 1);
    assert_eq!(restored.references.len(), 1);
    assert_eq!(restored.tournament_record.wins, 1);
}
