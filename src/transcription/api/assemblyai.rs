//! AssemblyAI API implementation.
//!
//! Handles transcription requests to AssemblyAI's async batch API using an
//! upload→submit→poll pattern. Unlike providers that answer a single
//! request, AssemblyAI requires:
//! 1. Upload audio binary data to get an upload URL
//! 2. Submit a transcription job referencing that URL
//! 3. Poll the job until it reaches a terminal status
//!
//! Each step classifies its own failures into the closed error taxonomy;
//! nothing is retried inside the adapter — a failed step fails the whole
//! attempt and the caller's provider-fallback loop decides what happens
//! next.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{default_sleeper, http_client, with_cancellation, PollConfig, Sleeper};
use crate::error::{SttError, SttErrorKind};
use crate::transcription::{
    TranscriptionProvider, TranscriptionRequest, TranscriptionResult, Transcriber,
};

const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";

/// Response from the upload endpoint
#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// Request body for the transcription endpoint
#[derive(Debug, Serialize)]
struct TranscriptRequest {
    audio_url: String,
    punctuate: bool,
    format_text: bool,
}

/// Response from the transcription endpoint (both submit and poll)
#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    text: Option<String>,
    error: Option<String>,
}

/// Transcribes via AssemblyAI's three-step async batch flow.
pub struct AssemblyAiAdapter {
    api_key: String,
    base_url: String,
    poll: PollConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl AssemblyAiAdapter {
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
        let base_url = &self.base_url;

        // Step 1: Upload audio
        let upload_url = self.upload(&client, &request.audio).await?;

        // Step 2: Submit transcription job
        let body = TranscriptRequest {
            audio_url: upload_url,
            punctuate: true,
            format_text: true,
        };

        tracing::debug!("Submitting AssemblyAI transcription job...");
        let submit_response = client
            .post(format!("{base_url}/v2/transcript"))
            .header("authorization", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(SttError::from)?;

        if !submit_response.status().is_success() {
            let status = submit_response.status().as_u16();
            let error_body = submit_response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SttError::from_status("AssemblyAI", status, &error_body));
        }

        let submitted: TranscriptResponse = submit_response.json().await.map_err(|e| {
            SttError::with_message(
                SttErrorKind::ProviderError,
                format!("Failed to parse AssemblyAI submit response: {e}"),
            )
        })?;

        let transcript_id = submitted.id;
        tracing::debug!("AssemblyAI job submitted, id: {transcript_id}");

        // Step 3: Poll until a terminal status or the polling deadline
        self.poll_transcript(&client, &transcript_id).await
    }

    async fn upload(&self, client: &reqwest::Client, audio: &[u8]) -> Result<String, SttError> {
        tracing::debug!("Uploading {} bytes to AssemblyAI...", audio.len());
        let upload_response = client
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(SttError::from)?;

        if !upload_response.status().is_success() {
            let status = upload_response.status().as_u16();
            let error_body = upload_response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SttError::from_status("AssemblyAI", status, &error_body));
        }

        let upload: UploadResponse = upload_response.json().await.map_err(|e| {
            SttError::with_message(
                SttErrorKind::ProviderError,
                format!("Failed to parse AssemblyAI upload response: {e}"),
            )
        })?;

        tracing::debug!("Audio uploaded successfully");
        Ok(upload.upload_url)
    }

    async fn poll_transcript(
        &self,
        client: &reqwest::Client,
        transcript_id: &str,
    ) -> Result<TranscriptionResult, SttError> {
        let poll_url = format!("{}/v2/transcript/{transcript_id}", self.base_url);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            if attempts > self.poll.max_attempts {
                return Err(SttError::with_message(
                    SttErrorKind::Timeout,
                    format!(
                        "AssemblyAI transcription timed out after {} polls at {:?} intervals",
                        self.poll.max_attempts, self.poll.interval
                    ),
                ));
            }

            let poll_response = client
                .get(&poll_url)
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(SttError::from)?;

            if !poll_response.status().is_success() {
                let status = poll_response.status().as_u16();
                let error_body = poll_response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(SttError::from_status("AssemblyAI", status, &error_body));
            }

            let result: TranscriptResponse = poll_response.json().await.map_err(|e| {
                SttError::with_message(
                    SttErrorKind::ProviderError,
                    format!("Failed to parse AssemblyAI poll response: {e}"),
                )
            })?;

            tracing::debug!(
                "Poll attempt {}/{}: status={}, id={}",
                attempts,
                self.poll.max_attempts,
                result.status,
                result.id
            );

            match result.status.as_str() {
                "completed" => {
                    let transcript = result.text.unwrap_or_default().trim().to_string();
                    if transcript.is_empty() {
                        return Err(SttError::with_message(
                            SttErrorKind::EmptyTranscript,
                            "AssemblyAI returned completed status but no transcript text",
                        ));
                    }
                    tracing::debug!("Transcription completed: {} chars", transcript.len());
                    return Ok(TranscriptionResult {
                        provider: TranscriptionProvider::AssemblyAI,
                        transcript,
                    });
                }
                "error" => {
                    let error = result
                        .error
                        .unwrap_or_else(|| "Unknown transcription error".to_string());
                    return Err(SttError::with_message(
                        SttErrorKind::ProviderError,
                        format!("AssemblyAI transcription failed: {error}"),
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
impl Transcriber for AssemblyAiAdapter {
    fn provider(&self) -> TranscriptionProvider {
        TranscriptionProvider::AssemblyAI
    }

    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionResult, SttError> {
        with_cancellation(cancel, self.run(request)).await
    }
}
