// src/config/mod.rs
// Runtime context for the hypothesis coordination layer
//
// Loaded once at startup and passed explicitly to the components that need
// it; there is no process-global configuration state.

use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// Explicitly constructed runtime context.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Model resolver file (TOML); None runs on the built-in default model.
    pub model_config_path: Option<PathBuf>,

    /// Where the multi-agent engine may persist its working set.
    pub storage_path: Option<PathBuf>,

    /// Worker pool size requested from the engine.
    pub max_workers: usize,

    /// Matches played per tournament round when the caller gives no count.
    pub default_match_count: usize,

    /// Log level for `init_tracing`.
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model_config_path: None,
            storage_path: None,
            max_workers: 4,
            default_match_count: 25,
            log_level: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Build the context from the environment, reading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            model_config_path: env_path("JNANA_MODEL_CONFIG"),
            storage_path: env_path("JNANA_STORAGE_PATH"),
            max_workers: env_var_or("JNANA_MAX_WORKERS", 4),
            default_match_count: env_var_or("JNANA_MATCH_COUNT", 25),
            log_level: env_var_or("JNANA_LOG_LEVEL", "info".to_string()),
        }
    }
}

/// An optional path variable; empty or unset means None.
fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|v| v.split('#').next().unwrap_or("").trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Parse an environment variable, tolerating trailing comments and
/// whitespace; fall back to the default on absence or parse failure.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            clean_val.parse::<T>().unwrap_or(default)
        }
        Err(_) => default,
    }
}

/// Install a global fmt subscriber at the configured level.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(config: &RuntimeConfig) {
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_or_trims_comments() {
        // SAFETY: variable is unique to this test.
        unsafe { std::env::set_var("JNANA_TEST_WORKERS", "8  # pool size") };
        assert_eq!(env_var_or::<usize>("JNANA_TEST_WORKERS", 4), 8);
        unsafe { std::env::remove_var("JNANA_TEST_WORKERS") };

        assert_eq!(env_var_or::<usize>("JNANA_TEST_ABSENT", 4), 4);
    }

    #[test]
    fn defaults_are_usable() {
        let config = RuntimeConfig::default();
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.default_match_count, 25);
        assert!(config.model_config_path.is_none());
    }
}
