//! Transcription API client with provider-specific implementations.
//!
//! Each provider speaks a different wire protocol — Deepgram is a single
//! synchronous call, ElevenLabs submits a job and polls it, AssemblyAI
//! uploads, submits, and polls — but they all share the plumbing here:
//! HTTP client construction, cancellation, and the injected sleep seam used
//! by the polling adapters.

mod assemblyai;
mod deepgram;
mod elevenlabs;

pub use assemblyai::AssemblyAiAdapter;
pub use deepgram::DeepgramAdapter;
pub use elevenlabs::ElevenLabsAdapter;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{SttError, SttErrorKind};
use crate::transcription::TranscriptionResult;

/// Polling cadence for job-based providers. Adapter configuration, never
/// caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status polls.
    pub interval: Duration,
    /// Maximum number of polls before the attempt times out.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    /// 3-second intervals with a 10-minute overall deadline.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 200,
        }
    }
}

/// Sleep seam for the polling loops, so tests can run them without waiting
/// on the wall clock.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Default [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub(crate) fn default_sleeper() -> Arc<dyn Sleeper> {
    Arc::new(TokioSleeper)
}

/// Builds the HTTP client used by every adapter call: request and connect
/// timeouts plus connection pooling for the polling loops.
pub(crate) fn http_client() -> Result<reqwest::Client, SttError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| {
            SttError::with_message(
                SttErrorKind::NetworkError,
                format!("Failed to create HTTP client: {e}"),
            )
        })
}

/// Races the adapter's protocol future against the per-call cancellation
/// token. Cancellation during any step — upload, submit, poll, or a sleep
/// between polls — surfaces as `timeout`.
pub(crate) async fn with_cancellation<F>(
    cancel: &CancellationToken,
    protocol: F,
) -> Result<TranscriptionResult, SttError>
where
    F: Future<Output = Result<TranscriptionResult, SttError>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(SttError::with_message(
            SttErrorKind::Timeout,
            "transcription cancelled",
        )),
        result = protocol => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::TranscriptionProvider;

    #[tokio::test]
    async fn cancellation_surfaces_as_timeout() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = with_cancellation(&cancel, async {
            // A protocol step that would otherwise hang forever.
            std::future::pending::<Result<TranscriptionResult, SttError>>().await
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind(), SttErrorKind::Timeout);
        assert!(err.retryable());
    }

    #[tokio::test]
    async fn completed_protocol_passes_through() {
        let cancel = CancellationToken::new();
        let result = with_cancellation(&cancel, async {
            Ok(TranscriptionResult {
                provider: TranscriptionProvider::Deepgram,
                transcript: "done".to_string(),
            })
        })
        .await
        .unwrap();
        assert_eq!(result.transcript, "done");
    }
}
