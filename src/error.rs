// src/error.rs
// Error taxonomy for the hypothesis coordination layer

/// Errors surfaced by the unified hypothesis layer.
///
/// Translation failures are recovered locally during batch migration (logged
/// and skipped per item); engine failures are absorbed by the adapter, which
/// returns the pre-call state instead of propagating. Only configuration
/// errors are expected to abort the calling operation.
#[derive(Debug, thiserror::Error)]
pub enum JnanaError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
