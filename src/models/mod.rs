// src/models/mod.rs
// Per-role LLM model configuration resolver
//
// The resolver is a read-only collaborator of the orchestration adapter: it
// supplies provider configuration per agent role and never fails a lookup.
// A missing role-specific entry silently falls back to the default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::JnanaError;

/// Provider configuration for one model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "deepseek-r1:8b".to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

/// Capability interface consumed by the orchestration adapter.
/// Lookups are infallible by contract.
pub trait ModelResolver: Send + Sync {
    /// Configuration used when no role-specific entry exists.
    fn default_config(&self) -> ModelConfig;

    /// Configuration for one agent role, falling back to the default.
    fn model_for_agent(&self, role: &str) -> ModelConfig;
}

/// A single fixed configuration answering for every role.
impl ModelResolver for ModelConfig {
    fn default_config(&self) -> ModelConfig {
        self.clone()
    }

    fn model_for_agent(&self, _role: &str) -> ModelConfig {
        self.clone()
    }
}

/// Resolver backed by a TOML file with a `[default]` table and optional
/// `[agents.<role>]` overrides. String values of the form `${VAR}` are
/// expanded from the environment at load time.
pub struct FileModelResolver {
    default: ModelConfig,
    agents: BTreeMap<String, ModelConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResolverFile {
    default: ModelConfig,
    agents: BTreeMap<String, ModelConfig>,
}

impl FileModelResolver {
    /// Load the resolver configuration. Missing or unparseable files are
    /// fatal at startup; they surface as `Configuration` errors.
    pub fn load(path: &Path) -> Result<Self, JnanaError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| JnanaError::Configuration(format!("reading {}: {e}", path.display())))?;
        Self::from_toml(&text)
            .map_err(|e| JnanaError::Configuration(format!("parsing {}: {e}", path.display())))
    }

    fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let mut file: ResolverFile = toml::from_str(text)?;
        expand_env_vars(&mut file.default);
        for config in file.agents.values_mut() {
            expand_env_vars(config);
        }
        Ok(Self {
            default: file.default,
            agents: file.agents,
        })
    }
}

impl ModelResolver for FileModelResolver {
    fn default_config(&self) -> ModelConfig {
        self.default.clone()
    }

    fn model_for_agent(&self, role: &str) -> ModelConfig {
        match self.agents.get(role) {
            Some(config) => config.clone(),
            None => {
                debug!("No model configured for role '{role}', using default");
                self.default.clone()
            }
        }
    }
}

fn expand_env_vars(config: &mut ModelConfig) {
    expand(&mut config.provider);
    expand(&mut config.model);
    if let Some(api_key) = config.api_key.as_mut() {
        expand(api_key);
    }
    if let Some(base_url) = config.base_url.as_mut() {
        expand(base_url);
    }
}

/// Replace a whole-string `${VAR}` placeholder with the environment value,
/// leaving the placeholder in place when the variable is unset.
fn expand(value: &mut String) {
    if let Some(name) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        if let Ok(resolved) = std::env::var(name) {
            *value = resolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [default]
        provider = "anthropic"
        model = "claude-sonnet-4-5"
        api_key = "${JNANA_TEST_API_KEY}"
        temperature = 0.5

        [agents.generation]
        provider = "openai"
        model = "gpt-4o"
    "#;

    #[test]
    fn role_lookup_falls_back_to_default() {
        let resolver = FileModelResolver::from_toml(SAMPLE).unwrap();
        assert_eq!(resolver.model_for_agent("generation").model, "gpt-4o");
        // Unknown role silently resolves to the default
        let ranking = resolver.model_for_agent("ranking");
        assert_eq!(ranking.provider, "anthropic");
        assert_eq!(ranking.temperature, 0.5);
        // Omitted fields take the documented defaults
        assert_eq!(ranking.max_tokens, 4096);
    }

    #[test]
    fn env_placeholders_expand_when_set() {
        // SAFETY: single-threaded with respect to this variable; no other
        // test reads it.
        unsafe { std::env::set_var("JNANA_TEST_API_KEY", "sk-test-123") };
        let resolver = FileModelResolver::from_toml(SAMPLE).unwrap();
        assert_eq!(
            resolver.default_config().api_key.as_deref(),
            Some("sk-test-123")
        );
        unsafe { std::env::remove_var("JNANA_TEST_API_KEY") };
    }

    #[test]
    fn unset_placeholder_is_left_verbatim() {
        let mut value = "${JNANA_MISSING_KEY}".to_string();
        expand(&mut value);
        assert_eq!(value, "${JNANA_MISSING_KEY}");
    }

    #[test]
    fn bad_toml_is_a_configuration_error() {
        assert!(FileModelResolver::from_toml("default = 3").is_err());
    }

    #[test]
    fn single_config_answers_every_role() {
        let config = ModelConfig::default();
        assert_eq!(config.model_for_agent("evolution").model, "deepseek-r1:8b");
        assert_eq!(config.default_config().provider, "ollama");
    }
}
