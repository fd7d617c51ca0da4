//! Artifact synthesis: transcript in, structured artifacts out.
//!
//! The LLM completion call itself is out of scope — it is consumed through
//! the [`CompletionClient`] trait as "prompt in, text plus usage out". This
//! module owns what surrounds it: resolving the model chain, trying each
//! model in order, estimating cost for guardrail logging, parsing the reply,
//! and falling back to the deterministic generator when the chain is
//! exhausted. Synthesis never surfaces a hard error to the session.

pub mod artifact;
pub mod context;
pub mod cost;
pub mod fallback;
pub mod model;
pub mod prompt;

pub use artifact::{clamp_per_kind, Artifact, ArtifactKind};
pub use context::{BookRef, SynthesisContext};
pub use cost::{
    check_cost_guardrails, estimate_cost_usd, usage_tokens, CostEstimate, CostGuardrails,
    UsageTokens,
};
pub use fallback::generate_fallback_artifacts;
pub use model::{ReasoningEffort, SynthesisConfig};
pub use prompt::build_synthesis_prompt;

use async_trait::async_trait;

/// One completion attempt against a specific model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub reasoning_effort: Option<ReasoningEffort>,
}

/// What a completion attempt returns: the reply text and the provider's raw
/// usage object (any shape; see [`usage_tokens`]).
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: serde_json::Value,
}

/// Opaque "generate text given prompt" capability supplied by the host.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<Completion>;
}

/// Synthesizes artifacts for one session.
///
/// Tries the primary model, then each fallback model in order, stopping at
/// the first model that returns a parseable, non-empty artifact array. When
/// every model fails — or the reply never parses — the deterministic
/// fallback generator produces the artifacts instead.
pub async fn synthesize_artifacts(
    client: &dyn CompletionClient,
    config: &SynthesisConfig,
    guardrails: &CostGuardrails,
    session_id: &str,
    transcript: &str,
    context: Option<&SynthesisContext>,
) -> Vec<Artifact> {
    if transcript.trim().is_empty() {
        return Vec::new();
    }

    let prompt = build_synthesis_prompt(transcript, context);

    for model in config.model_chain() {
        let request = CompletionRequest {
            model: model.to_string(),
            prompt: prompt.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            reasoning_effort: config.reasoning_effort,
        };

        let completion = match client.complete(&request).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(
                    session = session_id,
                    model,
                    "synthesis model failed, trying next: {e}"
                );
                continue;
            }
        };

        let usage = usage_tokens(&completion.usage);
        let estimate = estimate_cost_usd(model, usage.prompt_tokens, usage.completion_tokens);
        check_cost_guardrails(session_id, &estimate, guardrails);

        match parse_artifacts(&completion.text) {
            Some(artifacts) => {
                tracing::info!(
                    session = session_id,
                    model,
                    count = artifacts.len(),
                    "synthesis completed"
                );
                return clamp_per_kind(artifacts);
            }
            None => {
                tracing::warn!(
                    session = session_id,
                    model,
                    "synthesis reply was not a usable artifact array, trying next"
                );
            }
        }
    }

    tracing::warn!(
        session = session_id,
        "synthesis model chain exhausted, generating fallback artifacts"
    );
    generate_fallback_artifacts(transcript, context)
}

/// Parses the model reply into artifacts. Tolerates a fenced code block
/// around the JSON; anything else unparseable yields `None`.
fn parse_artifacts(text: &str) -> Option<Vec<Artifact>> {
    let body = strip_code_fence(text.trim());
    let artifacts: Vec<Artifact> = serde_json::from_str(body).ok()?;
    if artifacts.is_empty() {
        None
    } else {
        Some(artifacts)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") up to the first newline, then the
    // closing fence.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
