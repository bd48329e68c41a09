// src/migration/mod.rs
// Batch load/save of whole hypothesis sessions
//
// Loads tolerate malformed individual items (logged and skipped); a single
// bad record never aborts a batch. Saves are all-or-nothing: the envelope
// is written to a sibling temp file and renamed into place.

use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::{info, warn};

use crate::error::JnanaError;
use crate::hypothesis::UnifiedHypothesis;
use crate::translate::{protognosis, wisteria, ConversionReport};
use crate::utils::iso_now;

/// Version tag written into every session envelope.
pub const SESSION_FORMAT_VERSION: &str = "jnana-1.0";

/// Result of a batch session load.
#[derive(Debug)]
pub struct SessionLoad {
    pub hypotheses: Vec<UnifiedHypothesis>,
    pub report: ConversionReport,
}

/// Load hypotheses from an interactive-tool session file.
///
/// Accepts the three shapes the tool produces: an envelope with a
/// `hypotheses` key, a bare list, or a single hypothesis object.
pub async fn load_wisteria_session(path: &Path) -> Result<SessionLoad, JnanaError> {
    let root = read_session_file(path).await?;

    let items: Vec<Value> = match root {
        Value::Object(ref map) if map.contains_key("hypotheses") => match &map["hypotheses"] {
            Value::Array(items) => items.clone(),
            other => {
                return Err(JnanaError::Configuration(format!(
                    "interactive session {}: 'hypotheses' is not a list (found {})",
                    path.display(),
                    json_kind(other)
                )))
            }
        },
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        other => {
            return Err(JnanaError::Configuration(format!(
                "interactive session {}: unsupported top-level {}",
                path.display(),
                json_kind(&other)
            )))
        }
    };

    Ok(decode_items(&items, wisteria::decode, "wisteria_to_unified"))
}

/// Load hypotheses from a multi-agent engine session file.
/// The `hypotheses` key is required for this format.
pub async fn load_protognosis_session(path: &Path) -> Result<SessionLoad, JnanaError> {
    let root = read_session_file(path).await?;

    let items = root
        .get("hypotheses")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            JnanaError::Configuration(format!(
                "multi-agent session {}: missing 'hypotheses' list",
                path.display()
            ))
        })?;

    Ok(decode_items(items, protognosis::decode, "protognosis_to_unified"))
}

/// Load a session previously written by `save_unified_session`.
pub async fn load_unified_session(path: &Path) -> Result<SessionLoad, JnanaError> {
    let root = read_session_file(path).await?;

    let items = root
        .get("hypotheses")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            JnanaError::Configuration(format!(
                "unified session {}: missing 'hypotheses' list",
                path.display()
            ))
        })?;

    Ok(decode_items(
        items,
        |value| {
            serde_json::from_value::<UnifiedHypothesis>(value.clone())
                .map_err(|e| JnanaError::Translation(format!("unified hypothesis: {e}")))
        },
        "unified_session",
    ))
}

/// Save hypotheses as a self-describing jnana-1.0 session envelope.
///
/// Missing parent directories are created; the write is atomic (temp file
/// plus rename), so a failure leaves no partial session on disk.
pub async fn save_unified_session(
    hypotheses: &[UnifiedHypothesis],
    path: &Path,
    metadata: Option<Map<String, Value>>,
) -> Result<(), JnanaError> {
    let serialized = hypotheses
        .iter()
        .map(|h| {
            serde_json::to_value(h).map_err(|e| {
                JnanaError::Translation(format!("hypothesis {}: {e}", h.hypothesis_id))
            })
        })
        .collect::<Result<Vec<Value>, JnanaError>>()?;

    let envelope = json!({
        "format_version": SESSION_FORMAT_VERSION,
        "created_at": iso_now(),
        "metadata": Value::Object(metadata.unwrap_or_default()),
        "hypotheses": serialized,
    });
    let body = serde_json::to_vec_pretty(&envelope)
        .map_err(|e| JnanaError::Translation(format!("session envelope: {e}")))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                JnanaError::Configuration(format!("creating {}: {e}", parent.display()))
            })?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    tokio::fs::write(&tmp, &body)
        .await
        .map_err(|e| JnanaError::Configuration(format!("writing {}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| JnanaError::Configuration(format!("renaming into {}: {e}", path.display())))?;

    info!(
        "Saved session with {} hypotheses to {}",
        hypotheses.len(),
        path.display()
    );
    Ok(())
}

async fn read_session_file(path: &Path) -> Result<Value, JnanaError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| JnanaError::Configuration(format!("reading {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| JnanaError::Configuration(format!("parsing {}: {e}", path.display())))
}

fn decode_items(
    items: &[Value],
    decode: impl Fn(&Value) -> Result<UnifiedHypothesis, JnanaError>,
    conversion_type: &str,
) -> SessionLoad {
    let mut hypotheses = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match decode(item) {
            Ok(hypothesis) => hypotheses.push(hypothesis),
            Err(e) => warn!("Skipping session item {index}: {e}"),
        }
    }

    let report = ConversionReport::new(conversion_type, items.len(), hypotheses.len());
    if report.skipped() > 0 {
        warn!(
            "Converted {}/{} session items ({} skipped)",
            report.converted, report.attempted, report.skipped()
        );
    }
    SessionLoad { hypotheses, report }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
