//! Deepgram API implementation.
//!
//! Handles transcription requests to Deepgram's pre-recorded (batch) API.
//! A single synchronous call: POST the raw audio bytes, read the transcript
//! out of the nested response.

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{http_client, with_cancellation};
use crate::error::{SttError, SttErrorKind};
use crate::transcription::{
    TranscriptionProvider, TranscriptionRequest, TranscriptionResult, Transcriber,
};

const DEFAULT_BASE_URL: &str = "https://api.deepgram.com";

/// Deepgram nests the transcript three levels deep:
/// `results.channels[0].alternatives[0].transcript`.
#[derive(Debug, Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(Debug, Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(Debug, Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(Debug, Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

/// Transcribes via Deepgram's synchronous batch endpoint.
pub struct DeepgramAdapter {
    api_key: String,
    base_url: String,
}

impl DeepgramAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the adapter at a different API host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn run(&self, request: &TranscriptionRequest) -> Result<TranscriptionResult, SttError> {
        let client = http_client()?;
        let url = format!("{}/v1/listen", self.base_url);

        tracing::debug!(
            "Deepgram API Call: POST {url} ({} bytes, {})",
            request.audio.len(),
            request.normalized_mime()
        );

        let response = client
            .post(&url)
            .query(&[
                ("model", TranscriptionProvider::Deepgram.api_model_name()),
                ("punctuate", "true"),
                ("smart_format", "true"),
                ("diarize", "false"),
            ])
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", request.normalized_mime())
            .body(request.audio.clone())
            .send()
            .await
            .map_err(SttError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SttError::from_status("Deepgram", status, &error_body));
        }

        let parsed: DeepgramResponse = response.json().await.map_err(|e| {
            SttError::with_message(
                SttErrorKind::ProviderError,
                format!("Failed to parse Deepgram response: {e}"),
            )
        })?;

        let transcript = parsed
            .results
            .channels
            .first()
            .and_then(|channel| channel.alternatives.first())
            .map(|alternative| alternative.transcript.trim().to_string())
            .unwrap_or_default();

        if transcript.is_empty() {
            return Err(SttError::with_message(
                SttErrorKind::EmptyTranscript,
                "Deepgram returned no transcript text",
            ));
        }

        tracing::debug!("Transcription completed: {} chars", transcript.len());
        Ok(TranscriptionResult {
            provider: TranscriptionProvider::Deepgram,
            transcript,
        })
    }
}

#[async_trait]
impl Transcriber for DeepgramAdapter {
    fn provider(&self) -> TranscriptionProvider {
        TranscriptionProvider::Deepgram
    }

    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionResult, SttError> {
        with_cancellation(cancel, self.run(request)).await
    }
}
