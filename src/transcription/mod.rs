//! Transcription service for audio-to-text conversion.
//!
//! This module provides support for multiple transcription providers through
//! a unified contract: every provider adapter implements [`Transcriber`],
//! failing with a normalized [`SttError`]. Provider fallback is orchestrated
//! here (never inside an adapter): [`transcribe_with_fallback`] tries the
//! enabled, credentialed providers in priority order and stops at the first
//! success.

pub mod api;
pub mod provider;
pub mod registry;

pub use api::{PollConfig, Sleeper, TokioSleeper};
pub use provider::TranscriptionProvider;
pub use registry::{build_adapter, ProviderFlags};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::SttSettings;
use crate::error::{SttError, SttErrorKind};

/// Input to a provider adapter: opaque audio bytes plus the declared MIME
/// type of the clip.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Raw audio bytes. Never mutated by an adapter.
    pub audio: Vec<u8>,
    /// Declared MIME type, possibly carrying codec parameters
    /// (e.g. `audio/webm;codecs=opus`).
    pub mime_type: String,
}

impl TranscriptionRequest {
    pub fn new(audio: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            audio,
            mime_type: mime_type.into(),
        }
    }

    /// The MIME type with codec parameters stripped, as sent to providers.
    pub fn normalized_mime(&self) -> &str {
        self.mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// A file name for multipart uploads, derived from the MIME subtype.
    pub(crate) fn file_name(&self) -> String {
        let extension = match self.normalized_mime() {
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "audio/webm" => "webm",
            "audio/ogg" => "ogg",
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
            "audio/flac" => "flac",
            _ => "bin",
        };
        format!("audio.{extension}")
    }
}

/// Adapter output: which provider produced the transcript, and the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResult {
    pub provider: TranscriptionProvider,
    pub transcript: String,
}

/// The uniform transcription contract.
///
/// Adapters are stateless request/response functions: no state is retained
/// between invocations, and the only side effects are the outbound HTTP
/// calls. All suspensions (requests and poll sleeps) are cancellable via the
/// single `cancel` token; cancellation surfaces as the `timeout` error kind.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// The provider this adapter speaks to.
    fn provider(&self) -> TranscriptionProvider;

    /// Transcribes the given audio clip.
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionResult, SttError>;
}

/// Transcribes a clip using the first enabled, credentialed provider that
/// succeeds.
///
/// Providers are tried in priority order ([`TranscriptionProvider::all`]).
/// Providers that are disabled or have no usable credential are skipped;
/// a failed attempt is logged and the next provider is tried. The final
/// error is the last attempt's failure, or `provider_error` when no provider
/// was available at all.
pub async fn transcribe_with_fallback(
    settings: &SttSettings,
    request: &TranscriptionRequest,
    cancel: &CancellationToken,
) -> Result<TranscriptionResult, SttError> {
    let flags = ProviderFlags::resolve(settings);
    let mut last_error: Option<SttError> = None;

    for provider in TranscriptionProvider::all() {
        if !flags.enabled(*provider) {
            tracing::debug!("{} is disabled, skipping", provider.name());
            continue;
        }

        let Some(adapter) = build_adapter(*provider, settings) else {
            tracing::debug!("{} has no usable credential, skipping", provider.name());
            continue;
        };

        tracing::info!(
            "Transcribing with {} ({})",
            provider.name(),
            provider.api_model_name()
        );

        match adapter.transcribe(request, cancel).await {
            Ok(result) => return Ok(result),
            Err(e) => {
                tracing::warn!(
                    provider = provider.id(),
                    kind = e.kind().as_str(),
                    retryable = e.retryable(),
                    "transcription attempt failed: {e}"
                );
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        SttError::with_message(
            SttErrorKind::ProviderError,
            "no transcription provider is enabled and credentialed",
        )
    }))
}
