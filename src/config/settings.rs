//! Configuration structs and their environment/TOML loaders.
//!
//! All override values are stored exactly as supplied (trimmed nowhere,
//! parsed nowhere). Parsing happens at resolution time — in the adapter
//! registry for provider flags and credentials, and in the synthesis
//! resolvers for model parameters — where malformed values are ignored and
//! documented defaults substituted. An unset or empty variable always means
//! "use the default".
//!
//! Recognized environment variables:
//!
//! | Variable | Consumed by |
//! |---|---|
//! | `ELEVENLABS_API_KEY`, `DEEPGRAM_API_KEY`, `ASSEMBLYAI_API_KEY` | adapter registry |
//! | `STT_ELEVENLABS_ENABLED`, `STT_DEEPGRAM_ENABLED`, `STT_ASSEMBLYAI_ENABLED` | provider flags |
//! | `SYNTHESIS_MODEL`, `SYNTHESIS_FALLBACK_MODELS` | synthesis config resolver |
//! | `SYNTHESIS_TEMPERATURE`, `SYNTHESIS_MAX_TOKENS`, `SYNTHESIS_REASONING_EFFORT` | synthesis config resolver |
//! | `SYNTHESIS_TEMPERATURE_LOCKED_PREFIXES` | synthesis config resolver |
//! | `SYNTHESIS_COST_WARN_USD`, `SYNTHESIS_COST_HARD_CAP_USD` | cost guardrails |

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Failure loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Speech-to-text provider credentials and enable flags.
///
/// Flags are tri-state: `None` (or an empty/unrecognized value) means "use
/// the documented default"; only an explicit false-like value disables a
/// default-on provider, and only an explicit true-like value enables a
/// default-off one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SttSettings {
    pub elevenlabs_api_key: Option<String>,
    pub deepgram_api_key: Option<String>,
    pub assemblyai_api_key: Option<String>,
    pub elevenlabs_enabled: Option<String>,
    pub deepgram_enabled: Option<String>,
    pub assemblyai_enabled: Option<String>,
}

/// Raw overrides for the artifact-synthesis LLM call.
///
/// See [`crate::synthesis::SynthesisConfig::resolve`] for the defaulting and
/// leniency rules applied to each field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    /// Primary model id.
    pub model: Option<String>,
    /// Comma-separated ordered fallback model ids.
    pub fallback_models: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<String>,
    /// Completion token cap.
    pub max_tokens: Option<String>,
    /// One of `minimal`, `low`, `medium`, `high`.
    pub reasoning_effort: Option<String>,
    /// Comma-separated model-id prefixes whose family rejects temperature
    /// overrides (temperature is omitted entirely for matching models).
    pub temperature_locked_prefixes: Option<String>,
}

/// Cost guardrail thresholds in USD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailSettings {
    pub warn_usd: Option<String>,
    pub hard_cap_usd: Option<String>,
}

/// Complete core configuration, built once and passed by value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub stt: SttSettings,
    pub synthesis: SynthesisSettings,
    pub guardrails: GuardrailSettings,
}

impl CoreConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_env_map(&vars)
    }

    /// Builds the configuration from an explicit variable map.
    ///
    /// Variables that are set but empty are treated as unset, so a host can
    /// ship a `.env` template with blank values without changing behavior.
    pub fn from_env_map(vars: &HashMap<String, String>) -> Self {
        let get = |name: &str| -> Option<String> {
            vars.get(name)
                .map(|v| v.to_string())
                .filter(|v| !v.trim().is_empty())
        };

        CoreConfig {
            stt: SttSettings {
                elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
                deepgram_api_key: get("DEEPGRAM_API_KEY"),
                assemblyai_api_key: get("ASSEMBLYAI_API_KEY"),
                elevenlabs_enabled: get("STT_ELEVENLABS_ENABLED"),
                deepgram_enabled: get("STT_DEEPGRAM_ENABLED"),
                assemblyai_enabled: get("STT_ASSEMBLYAI_ENABLED"),
            },
            synthesis: SynthesisSettings {
                model: get("SYNTHESIS_MODEL"),
                fallback_models: get("SYNTHESIS_FALLBACK_MODELS"),
                temperature: get("SYNTHESIS_TEMPERATURE"),
                max_tokens: get("SYNTHESIS_MAX_TOKENS"),
                reasoning_effort: get("SYNTHESIS_REASONING_EFFORT"),
                temperature_locked_prefixes: get("SYNTHESIS_TEMPERATURE_LOCKED_PREFIXES"),
            },
            guardrails: GuardrailSettings {
                warn_usd: get("SYNTHESIS_COST_WARN_USD"),
                hard_cap_usd: get("SYNTHESIS_COST_HARD_CAP_USD"),
            },
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    /// - If the TOML is malformed
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_env_yields_all_defaults() {
        let config = CoreConfig::from_env_map(&HashMap::new());
        assert!(config.stt.elevenlabs_api_key.is_none());
        assert!(config.synthesis.model.is_none());
        assert!(config.guardrails.warn_usd.is_none());
    }

    #[test]
    fn blank_variables_are_treated_as_unset() {
        let config = CoreConfig::from_env_map(&vars(&[
            ("ELEVENLABS_API_KEY", "   "),
            ("SYNTHESIS_MODEL", ""),
        ]));
        assert!(config.stt.elevenlabs_api_key.is_none());
        assert!(config.synthesis.model.is_none());
    }

    #[test]
    fn set_variables_are_kept_raw() {
        let config = CoreConfig::from_env_map(&vars(&[
            ("DEEPGRAM_API_KEY", "  dg-key  "),
            ("STT_ASSEMBLYAI_ENABLED", "true"),
            ("SYNTHESIS_TEMPERATURE", "not-a-number"),
        ]));
        // Raw values survive; trimming and parsing happen at resolution time.
        assert_eq!(config.stt.deepgram_api_key.as_deref(), Some("  dg-key  "));
        assert_eq!(config.stt.assemblyai_enabled.as_deref(), Some("true"));
        assert_eq!(
            config.synthesis.temperature.as_deref(),
            Some("not-a-number")
        );
    }

    #[test]
    fn toml_round_trip() {
        let toml_text = r#"
            [stt]
            deepgram_api_key = "dg-key"
            assemblyai_enabled = "true"

            [synthesis]
            model = "gpt-5-mini"

            [guardrails]
            warn_usd = "0.25"
        "#;
        let config = CoreConfig::from_toml_str(toml_text).unwrap();
        assert_eq!(config.stt.deepgram_api_key.as_deref(), Some("dg-key"));
        assert_eq!(config.synthesis.model.as_deref(), Some("gpt-5-mini"));
        assert_eq!(config.guardrails.warn_usd.as_deref(), Some("0.25"));
        assert!(config.stt.elevenlabs_api_key.is_none());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(CoreConfig::from_toml_str("not [valid").is_err());
    }
}
