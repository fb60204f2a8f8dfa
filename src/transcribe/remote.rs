//! HTTP client for the remote transcription service.
//!
//! Speaks the submit/wait shape: `POST /v1/transcriptions` uploads one WAV
//! chunk and returns an operation id, `GET /v1/operations/{id}` polls until
//! the operation is done or the wait deadline lapses. The deadline bounds
//! every HTTP exchange, so a remote that accepts a connection and never
//! answers cannot suspend the pipeline.

use crate::audio::{AudioChunk, wav};
use crate::defaults;
use crate::error::{Result, ScribaError};
use crate::language::Language;
use crate::transcribe::client::TranscriptionClient;
use crate::transcribe::retry::RetryPolicy;
use crate::transcribe::types::{ChunkResult, WordSpan};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Remote service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Service base URL; the `/v1/...` paths are appended.
    pub base_url: String,
    /// Lower diarization bound passed to the service.
    pub min_speakers: u32,
    /// Upper diarization bound passed to the service.
    pub max_speakers: u32,
    /// Deadline in seconds for one chunk's submission and recognition.
    pub wait_timeout_secs: u64,
    /// Poll interval in milliseconds while an operation is pending.
    pub poll_interval_ms: u64,
    /// Backoff applied by a wrapping [`RetryingClient`].
    ///
    /// [`RetryingClient`]: crate::transcribe::retry::RetryingClient
    pub retry: RetryPolicy,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            min_speakers: defaults::MIN_SPEAKERS,
            max_speakers: defaults::MAX_SPEAKERS,
            wait_timeout_secs: defaults::WAIT_TIMEOUT_SECS,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            retry: RetryPolicy::default(),
        }
    }
}

// Wire shapes for the service API. Unknown fields are ignored so the client
// tolerates additive server changes.

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    operation_id: String,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    done: bool,
    #[serde(default)]
    result: Option<RecognitionPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct RecognitionPayload {
    #[serde(default)]
    words: Vec<RecognizedWord>,
    #[serde(default)]
    speaker_count: u32,
}

#[derive(Debug, Deserialize)]
struct RecognizedWord {
    text: String,
    start_secs: f64,
    end_secs: f64,
    #[serde(default)]
    speaker: u32,
}

/// Transcribes chunks over HTTP against a remote recognition service.
///
/// One instance is shared across all in-flight chunks; `reqwest::Client`
/// pools connections internally.
pub struct RemoteTranscriptionClient {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteTranscriptionClient {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Upload one chunk; returns the operation id to poll.
    async fn submit(
        &self,
        chunk: &AudioChunk,
        language: Language,
        deadline: Instant,
    ) -> Result<String> {
        let wav_bytes = wav::encode(&chunk.samples, chunk.format.sample_rate)?;
        let part = reqwest::multipart::Part::bytes(wav_bytes)
            .file_name(format!("chunk-{:04}.wav", chunk.index))
            .mime_str("audio/wav")
            .map_err(|e| ScribaError::Other(format!("Failed to build upload part: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .part("audio", part)
            .text("language", language.code())
            .text("min_speakers", self.config.min_speakers.to_string())
            .text("max_speakers", self.config.max_speakers.to_string())
            .text("punctuation", "true")
            .text("word_offsets", "true");
        let request = self
            .http
            .post(submit_url(&self.config.base_url))
            .multipart(form);

        let submitted: SubmitResponse = self.fetch_json(request, "submit", deadline).await?;
        Ok(submitted.operation_id)
    }

    /// Poll the operation until done or the wait deadline lapses.
    async fn wait(&self, operation_id: &str, deadline: Instant) -> Result<RecognitionPayload> {
        let url = operation_url(&self.config.base_url, operation_id);
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            let operation: OperationStatus = self
                .fetch_json(self.http.get(&url), "operation", deadline)
                .await?;
            if operation.done {
                return completed_payload(operation);
            }

            // Sleeping would cross the deadline; the next poll cannot happen.
            if Instant::now() + interval >= deadline {
                return Err(self.timed_out());
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Send one request and parse its JSON body, bounded by the deadline.
    ///
    /// `reqwest::Client` sets no request timeout of its own; without the
    /// bound here a stalled connect, send, or body read suspends forever.
    async fn fetch_json<T>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
        deadline: Instant,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let exchange = async {
            let response = request.send().await.map_err(connect_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(classify_status(status.as_u16()));
            }
            response
                .json::<T>()
                .await
                .map_err(|e| ScribaError::RemoteRejected {
                    message: format!("malformed {what} response: {e}"),
                })
        };
        match tokio::time::timeout_at(deadline, exchange).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out()),
        }
    }

    fn timed_out(&self) -> ScribaError {
        ScribaError::RemoteTimeout {
            seconds: self.config.wait_timeout_secs,
        }
    }
}

#[async_trait]
impl TranscriptionClient for RemoteTranscriptionClient {
    #[instrument(skip_all, fields(chunk = chunk.index, language = %language))]
    async fn transcribe(&self, chunk: &AudioChunk, language: Language) -> Result<ChunkResult> {
        debug!(seconds = chunk.duration_secs(), "submitting chunk for transcription");
        let deadline = Instant::now() + Duration::from_secs(self.config.wait_timeout_secs);
        let operation_id = self.submit(chunk, language, deadline).await?;
        let payload = self.wait(&operation_id, deadline).await?;
        debug!(words = payload.words.len(), "chunk recognized");
        Ok(payload_to_result(chunk.index, payload))
    }
}

fn submit_url(base_url: &str) -> String {
    format!("{}/v1/transcriptions", base_url.trim_end_matches('/'))
}

fn operation_url(base_url: &str, operation_id: &str) -> String {
    format!(
        "{}/v1/operations/{operation_id}",
        base_url.trim_end_matches('/')
    )
}

/// Map a non-success HTTP status to the error taxonomy.
///
/// 429 and 5xx are transient; other 4xx mean the request itself was refused.
/// Bodies are never propagated, only the status code.
fn classify_status(status: u16) -> ScribaError {
    if status == 429 || status >= 500 {
        ScribaError::RemoteUnavailable {
            message: format!("service returned status {status}"),
        }
    } else {
        ScribaError::RemoteRejected {
            message: format!("service returned status {status}"),
        }
    }
}

fn connect_error(error: reqwest::Error) -> ScribaError {
    ScribaError::RemoteUnavailable {
        message: format!("request failed: {error}"),
    }
}

/// Extract the recognition payload from a finished operation.
///
/// `done` without a result is a protocol violation; surfacing it as a
/// rejection keeps it from degrading into an empty transcript.
fn completed_payload(operation: OperationStatus) -> Result<RecognitionPayload> {
    operation.result.ok_or_else(|| ScribaError::RemoteRejected {
        message: "operation done without result".to_string(),
    })
}

/// Convert a recognition payload into the pipeline's per-chunk result.
///
/// The reported speaker count is reconciled with the highest tag actually
/// present in the word list, whichever is larger.
fn payload_to_result(chunk_index: u64, payload: RecognitionPayload) -> ChunkResult {
    let tag_max = payload.words.iter().map(|w| w.speaker).max().unwrap_or(0);
    let words = payload
        .words
        .into_iter()
        .map(|w| WordSpan::new(&w.text, w.start_secs, w.end_secs, w.speaker))
        .collect();
    ChunkResult {
        chunk_index,
        words,
        local_speaker_count: payload.speaker_count.max(tag_max),
    }
}
