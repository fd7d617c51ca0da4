//! ElevenLabs Scribe API implementation.
//!
//! Handles transcription requests to ElevenLabs' batch speech-to-text API
//! using a submit→poll pattern: POST the audio as multipart form data to
//! create a transcription job, then poll the transcript resource until it
//! reaches a terminal status. Short clips may come back completed in the
//! submit response itself, in which case no polling happens.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{default_sleeper, http_client, with_cancellation, PollConfig, Sleeper};
use crate::error::{SttError, SttErrorKind};
use crate::transcription::{
    TranscriptionProvider, TranscriptionRequest, TranscriptionResult, Transcriber,
};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Response from the submit endpoint. Either an inline completed transcript
/// (short clips) or a job id to poll.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    transcription_id: Option<String>,
    text: Option<String>,
}

/// Response from the transcript polling endpoint
#[derive(Debug, Deserialize)]
struct TranscriptStatusResponse {
    status: String,
    text: Option<String>,
    error: Option<String>,
}

/// Transcribes via ElevenLabs' Scribe batch job API.
pub struct ElevenLabsAdapter {
    api_key: String,
    base_url: String,
    poll: PollConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl ElevenLabsAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll: PollConfig::default(),
            sleeper: default_sleeper(),
        }
    }

    /// Points the adapter at a different API host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    async fn run(&self, request: &TranscriptionRequest) -> Result<TranscriptionResult, SttError> {
        let client = http_client()?;

        // Submit the job
        let file_part = reqwest::multipart::Part::bytes(request.audio.clone())
            .file_name(request.file_name())
            .mime_str(request.normalized_mime())
            .map_err(|e| {
                SttError::with_message(
                    SttErrorKind::ProviderError,
                    format!("Failed to create file part for upload: {e}"),
                )
            })?;

        let form = reqwest::multipart::Form::new().part("file", file_part).text(
            "model_id",
            TranscriptionProvider::ElevenLabs.api_model_name(),
        );

        tracing::debug!("Submitting ElevenLabs transcription job...");
        let response = client
            .post(format!("{}/v1/speech-to-text", self.base_url))
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(SttError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SttError::from_status("ElevenLabs", status, &error_body));
        }

        let submitted: SubmitResponse = response.json().await.map_err(|e| {
            SttError::with_message(
                SttErrorKind::ProviderError,
                format!("Failed to parse ElevenLabs submit response: {e}"),
            )
        })?;

        // Short clips complete inline
        if let Some(text) = submitted.text.as_deref() {
            let transcript = text.trim();
            if !transcript.is_empty() {
                tracing::debug!("Transcription completed inline: {} chars", transcript.len());
                return Ok(TranscriptionResult {
                    provider: TranscriptionProvider::ElevenLabs,
                    transcript: transcript.to_string(),
                });
            }
        }

        let transcription_id = submitted.transcription_id.ok_or_else(|| {
            SttError::with_message(
                SttErrorKind::ProviderError,
                "ElevenLabs returned neither a transcript nor a transcription id",
            )
        })?;
        tracing::debug!("ElevenLabs job submitted, id: {transcription_id}");

        self.poll_transcript(&client, &transcription_id).await
    }

    async fn poll_transcript(
        &self,
        client: &reqwest::Client,
        transcription_id: &str,
    ) -> Result<TranscriptionResult, SttError> {
        let poll_url = format!(
            "{}/v1/speech-to-text/transcripts/{transcription_id}",
            self.base_url
        );
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            if attempts > self.poll.max_attempts {
                return Err(SttError::with_message(
                    SttErrorKind::Timeout,
                    format!(
                        "ElevenLabs transcription timed out after {} polls at {:?} intervals",
                        self.poll.max_attempts, self.poll.interval
                    ),
                ));
            }

            let poll_response = client
                .get(&poll_url)
                .header("xi-api-key", &self.api_key)
                .send()
                .await
                .map_err(SttError::from)?;

            if !poll_response.status().is_success() {
                let status = poll_response.status().as_u16();
                let error_body = poll_response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(SttError::from_status("ElevenLabs", status, &error_body));
            }

            let result: TranscriptStatusResponse = poll_response.json().await.map_err(|e| {
                SttError::with_message(
                    SttErrorKind::ProviderError,
                    format!("Failed to parse ElevenLabs poll response: {e}"),
                )
            })?;

            tracing::debug!(
                "Poll attempt {}/{}: status={}",
                attempts,
                self.poll.max_attempts,
                result.status
            );

            match result.status.as_str() {
                "completed" => {
                    let transcript = result.text.unwrap_or_default().trim().to_string();
                    if transcript.is_empty() {
                        return Err(SttError::with_message(
                            SttErrorKind::EmptyTranscript,
                            "ElevenLabs returned completed status but no transcript text",
                        ));
                    }
                    tracing::debug!("Transcription completed: {} chars", transcript.len());
                    return Ok(TranscriptionResult {
                        provider: TranscriptionProvider::ElevenLabs,
                        transcript,
                    });
                }
                "error" => {
                    let error = result
                        .error
                        .unwrap_or_else(|| "Unknown transcription error".to_string());
                    return Err(SttError::with_message(
                        SttErrorKind::ProviderError,
                        format!("ElevenLabs transcription failed: {error}"),
                    ));
                }
                _ => {
                    // Still queued or processing
                    self.sleeper.sleep(self.poll.interval).await;
                }
            }
        }
    }
}

#[async_trait]
impl Transcriber for ElevenLabsAdapter {
    fn provider(&self) -> TranscriptionProvider {
        TranscriptionProvider::ElevenLabs
    }

    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionResult, SttError> {
        with_cancellation(cancel, self.run(request)).await
    }
}
