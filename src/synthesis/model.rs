//! Synthesis model selection and parameters.
//!
//! Resolves the model chain and sampling parameters for the artifact
//! synthesis call from raw configuration, with deterministic defaults.
//! Malformed overrides are ignored and the default substituted — a bad
//! environment variable must never take sessions down.

use serde::{Deserialize, Serialize};

use crate::config::SynthesisSettings;

/// Default primary model for artifact synthesis.
pub const DEFAULT_PRIMARY_MODEL: &str = "gpt-5-preview";

/// Default fallback candidates, in order. The resolved fallback list is this
/// pool minus whichever model is primary, first two entries.
const DEFAULT_FALLBACK_POOL: &[&str] = &["gpt-5-preview", "gpt-5-mini", "gpt-4o-mini"];

const DEFAULT_FALLBACK_COUNT: usize = 2;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;

pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Model-id prefixes whose family rejects temperature overrides. Kept as
/// configuration (`temperature_locked_prefixes`) so provider renames don't
/// silently stale this list.
const DEFAULT_TEMPERATURE_LOCKED_PREFIXES: &[&str] = &["gpt-5"];

/// Reasoning effort accepted by reasoning-capable models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Minimal => "minimal",
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }

    /// Parses a configured level. Anything outside the closed set yields
    /// `None` (ignored, not an error).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "minimal" => Some(ReasoningEffort::Minimal),
            "low" => Some(ReasoningEffort::Low),
            "medium" => Some(ReasoningEffort::Medium),
            "high" => Some(ReasoningEffort::High),
            _ => None,
        }
    }
}

/// Resolved model selection for one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisConfig {
    /// Primary model id.
    pub model: String,
    /// Ordered fallback model ids; never contains the primary model or
    /// duplicates.
    pub fallback_models: Vec<String>,
    /// Sampling temperature; `None` for temperature-locked model families.
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub reasoning_effort: Option<ReasoningEffort>,
}

impl SynthesisConfig {
    /// Resolves the synthesis configuration from raw settings.
    pub fn resolve(settings: &SynthesisSettings) -> Self {
        let model = settings
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_PRIMARY_MODEL)
            .to_string();

        let fallback_models = match settings.fallback_models.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_fallback_list(raw, &model),
            _ => DEFAULT_FALLBACK_POOL
                .iter()
                .filter(|candidate| **candidate != model)
                .take(DEFAULT_FALLBACK_COUNT)
                .map(|candidate| candidate.to_string())
                .collect(),
        };

        let locked_prefixes = parse_locked_prefixes(settings);
        let temperature = if locked_prefixes
            .iter()
            .any(|prefix| model.starts_with(prefix.as_str()))
        {
            None
        } else {
            Some(
                settings
                    .temperature
                    .as_deref()
                    .and_then(parse_f64)
                    .unwrap_or(DEFAULT_TEMPERATURE),
            )
        };

        let max_tokens = Some(
            settings
                .max_tokens
                .as_deref()
                .and_then(parse_u32)
                .unwrap_or(DEFAULT_MAX_TOKENS),
        );

        let reasoning_effort = settings
            .reasoning_effort
            .as_deref()
            .and_then(ReasoningEffort::parse);

        Self {
            model,
            fallback_models,
            temperature,
            max_tokens,
            reasoning_effort,
        }
    }

    /// The primary model followed by its fallbacks, in attempt order.
    pub fn model_chain(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.model.as_str()).chain(self.fallback_models.iter().map(String::as_str))
    }
}

/// Splits an explicit fallback list on commas, trims entries, drops blanks,
/// deduplicates (case-sensitive exact match) and removes the primary model,
/// preserving first-seen order.
fn parse_fallback_list(raw: &str, primary: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| *entry != primary)
        .filter(|entry| seen.insert(entry.to_string()))
        .map(str::to_string)
        .collect()
}

fn parse_locked_prefixes(settings: &SynthesisSettings) -> Vec<String> {
    match settings.temperature_locked_prefixes.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .map(str::to_string)
            .collect(),
        _ => DEFAULT_TEMPERATURE_LOCKED_PREFIXES
            .iter()
            .map(|prefix| prefix.to_string())
            .collect(),
    }
}

fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_u32(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_with_empty_settings() {
        let config = SynthesisConfig::resolve(&SynthesisSettings::default());
        assert_eq!(config.model, "gpt-5-preview");
        assert_eq!(
            config.fallback_models,
            vec!["gpt-5-mini".to_string(), "gpt-4o-mini".to_string()]
        );
        // gpt-5-preview is temperature-locked by the default prefix list.
        assert_eq!(config.temperature, None);
        assert_eq!(config.max_tokens, Some(DEFAULT_MAX_TOKENS));
        assert_eq!(config.reasoning_effort, None);
    }

    #[test]
    fn default_fallbacks_exclude_an_overridden_primary() {
        let settings = SynthesisSettings {
            model: Some("gpt-5-mini".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(
            config.fallback_models,
            vec!["gpt-5-preview".to_string(), "gpt-4o-mini".to_string()]
        );
    }

    #[test]
    fn explicit_fallbacks_are_trimmed_deduped_and_primary_free() {
        let settings = SynthesisSettings {
            model: Some("gpt-5-preview".into()),
            fallback_models: Some(" gpt-4o , gpt-5-preview, gpt-4o-mini ,gpt-4o,, ".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(
            config.fallback_models,
            vec!["gpt-4o".to_string(), "gpt-4o-mini".to_string()]
        );
    }

    #[test]
    fn fallback_dedup_is_case_sensitive() {
        let settings = SynthesisSettings {
            fallback_models: Some("gpt-4o,GPT-4o".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(
            config.fallback_models,
            vec!["gpt-4o".to_string(), "GPT-4o".to_string()]
        );
    }

    #[test]
    fn temperature_applies_outside_locked_families() {
        let settings = SynthesisSettings {
            model: Some("gpt-4o-mini".into()),
            temperature: Some("0.3".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(config.temperature, Some(0.3));
    }

    #[test]
    fn temperature_is_omitted_for_locked_prefixes() {
        let settings = SynthesisSettings {
            model: Some("gpt-5-mini".into()),
            temperature: Some("0.3".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(config.temperature, None);
    }

    #[test]
    fn locked_prefix_list_is_configurable() {
        let settings = SynthesisSettings {
            model: Some("o9-large".into()),
            temperature_locked_prefixes: Some("o9, o10".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(config.temperature, None);

        // With custom prefixes, gpt-5 models are no longer locked.
        let settings = SynthesisSettings {
            model: Some("gpt-5-mini".into()),
            temperature_locked_prefixes: Some("o9".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(config.temperature, Some(DEFAULT_TEMPERATURE));
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let settings = SynthesisSettings {
            model: Some("gpt-4o".into()),
            temperature: Some("warm".into()),
            max_tokens: Some("lots".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(config.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(config.max_tokens, Some(DEFAULT_MAX_TOKENS));
    }

    #[test]
    fn reasoning_effort_accepts_only_the_closed_set() {
        for (raw, expected) in [
            ("minimal", Some(ReasoningEffort::Minimal)),
            (" LOW ", Some(ReasoningEffort::Low)),
            ("medium", Some(ReasoningEffort::Medium)),
            ("high", Some(ReasoningEffort::High)),
            ("extreme", None),
            ("", None),
        ] {
            assert_eq!(ReasoningEffort::parse(raw), expected, "raw={raw:?}");
        }

        let settings = SynthesisSettings {
            reasoning_effort: Some("extreme".into()),
            ..Default::default()
        };
        let config = SynthesisConfig::resolve(&settings);
        assert_eq!(config.reasoning_effort, None);
    }

    #[test]
    fn model_chain_starts_with_primary() {
        let config = SynthesisConfig::resolve(&SynthesisSettings::default());
        let chain: Vec<&str> = config.model_chain().collect();
        assert_eq!(chain, vec!["gpt-5-preview", "gpt-5-mini", "gpt-4o-mini"]);
    }
}
