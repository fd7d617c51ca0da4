//! Synthesis cost estimation and observability-only guardrails.
//!
//! Token rates are looked up by model-id prefix (most specific match wins);
//! unrecognized models are billed at the cheapest known family so an
//! estimate always exists. Guardrail breaches are logged, never thrown —
//! they must not block or retry the synthesis call.

use serde::Serialize;

use crate::config::GuardrailSettings;

/// USD per 1M tokens for one model family, keyed by model-id prefix.
struct FamilyRate {
    prefix: &'static str,
    input_usd_per_mtok: f64,
    output_usd_per_mtok: f64,
}

/// Updated 2026-02-20. Re-check provider pricing pages before relying on
/// these beyond guardrail logging.
const MODEL_RATES: &[FamilyRate] = &[
    FamilyRate {
        prefix: "gpt-5-nano",
        input_usd_per_mtok: 0.05,
        output_usd_per_mtok: 0.40,
    },
    FamilyRate {
        prefix: "gpt-5-mini",
        input_usd_per_mtok: 0.25,
        output_usd_per_mtok: 2.00,
    },
    FamilyRate {
        prefix: "gpt-5",
        input_usd_per_mtok: 1.25,
        output_usd_per_mtok: 10.00,
    },
    FamilyRate {
        prefix: "gpt-4o-mini",
        input_usd_per_mtok: 0.15,
        output_usd_per_mtok: 0.60,
    },
    FamilyRate {
        prefix: "gpt-4o",
        input_usd_per_mtok: 2.50,
        output_usd_per_mtok: 10.00,
    },
];

/// Index into [`MODEL_RATES`] of the cheapest family, used for unrecognized
/// models.
const LOWEST_COST_RATE: usize = 0;

/// Derived USD cost of one synthesis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub cost_usd: f64,
}

/// Estimates the USD cost of a synthesis call.
pub fn estimate_cost_usd(model: &str, prompt_tokens: u64, completion_tokens: u64) -> CostEstimate {
    let rate = MODEL_RATES
        .iter()
        .filter(|rate| model.starts_with(rate.prefix))
        .max_by_key(|rate| rate.prefix.len())
        .unwrap_or(&MODEL_RATES[LOWEST_COST_RATE]);

    let cost_usd = (prompt_tokens as f64 * rate.input_usd_per_mtok
        + completion_tokens as f64 * rate.output_usd_per_mtok)
        / 1_000_000.0;

    CostEstimate {
        model: model.to_string(),
        prompt_tokens,
        completion_tokens,
        cost_usd,
    }
}

/// Normalized token counts from a provider usage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageTokens {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Derives prompt/completion token counts from any provider usage shape.
///
/// Checks, in order: explicit prompt/input fields, explicit
/// completion/output fields, and finally a total-token field — when prompt
/// tokens are absent but a total is present, `prompt = max(0, total -
/// completion)` to avoid double counting. All values are floored to
/// non-negative integers.
pub fn usage_tokens(raw: &serde_json::Value) -> UsageTokens {
    let completion_tokens =
        int_field(raw, &["completion_tokens", "output_tokens"]).unwrap_or_default();
    let prompt_tokens = int_field(raw, &["prompt_tokens", "input_tokens"])
        .or_else(|| {
            int_field(raw, &["total_tokens"]).map(|total| total.saturating_sub(completion_tokens))
        })
        .unwrap_or_default();

    UsageTokens {
        prompt_tokens,
        completion_tokens,
    }
}

fn int_field(raw: &serde_json::Value, names: &[&str]) -> Option<u64> {
    names
        .iter()
        .find_map(|name| raw.get(name).and_then(non_negative_int))
}

fn non_negative_int(value: &serde_json::Value) -> Option<u64> {
    if let Some(v) = value.as_u64() {
        Some(v)
    } else if value.as_i64().is_some() {
        // Negative integer: floor to zero.
        Some(0)
    } else {
        value
            .as_f64()
            .filter(|v| v.is_finite())
            .map(|v| v.max(0.0).floor() as u64)
    }
}

/// Cost thresholds in USD. Crossing them is logged, never enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostGuardrails {
    pub warn_usd: f64,
    pub hard_cap_usd: f64,
}

pub const DEFAULT_WARN_USD: f64 = 0.10;
pub const DEFAULT_HARD_CAP_USD: f64 = 0.50;

impl Default for CostGuardrails {
    fn default() -> Self {
        Self {
            warn_usd: DEFAULT_WARN_USD,
            hard_cap_usd: DEFAULT_HARD_CAP_USD,
        }
    }
}

impl CostGuardrails {
    /// Resolves thresholds from raw settings; unparsable values fall back to
    /// the defaults.
    pub fn resolve(settings: &GuardrailSettings) -> Self {
        let parse = |raw: &Option<String>, default: f64| {
            raw.as_deref()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(default)
        };
        Self {
            warn_usd: parse(&settings.warn_usd, DEFAULT_WARN_USD),
            hard_cap_usd: parse(&settings.hard_cap_usd, DEFAULT_HARD_CAP_USD),
        }
    }
}

/// Logs a structured event when an estimate crosses a threshold.
///
/// Observability only: callers proceed with the synthesis result regardless.
pub fn check_cost_guardrails(session_id: &str, estimate: &CostEstimate, limits: &CostGuardrails) {
    if estimate.cost_usd > limits.hard_cap_usd {
        tracing::error!(
            session = session_id,
            model = %estimate.model,
            prompt_tokens = estimate.prompt_tokens,
            completion_tokens = estimate.completion_tokens,
            cost_usd = estimate.cost_usd,
            hard_cap_usd = limits.hard_cap_usd,
            "synthesis cost exceeded hard cap"
        );
    } else if estimate.cost_usd > limits.warn_usd {
        tracing::warn!(
            session = session_id,
            model = %estimate.model,
            prompt_tokens = estimate.prompt_tokens,
            completion_tokens = estimate.completion_tokens,
            cost_usd = estimate.cost_usd,
            warn_usd = limits.warn_usd,
            "synthesis cost exceeded warn threshold"
        );
    }
}
