//! Background job processing around the transcription pipeline.
//!
//! A [`Job`] carries one uploaded recording through transcription,
//! summarization, status reporting, and usage accounting. The status and
//! usage sinks are traits so storage stays outside this crate.

pub mod status;
pub mod usage;

pub use status::{JobStatus, MemoryStatusSink, StatusSink, StatusUpdate};
pub use usage::{Clock, FixedClock, MemoryUsageSink, SystemClock, UsagePeriod, UsageSink};

use crate::assemble::TranscriptResult;
use crate::error::Result;
use crate::language::Language;
use crate::orchestrate::TranscriptionOrchestrator;
use crate::summary::{self, Summarizer};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Opaque job identifier assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of the account a job bills to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One transcription job as submitted by the caller.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub owner: OwnerId,
    /// Raw WAV bytes of the uploaded recording.
    pub audio: Vec<u8>,
    pub language: Language,
    /// Where the caller stored the original upload; echoed into the done
    /// status, never dereferenced here.
    pub audio_uri: String,
}

/// Drives one job end to end.
///
/// On success the job lands in `Done` with transcript, summary, and usage
/// recorded; on any failure it lands in `Error` and the error propagates.
/// A failed job never stores a partial transcript.
pub struct JobProcessor {
    orchestrator: TranscriptionOrchestrator,
    summarizer: Arc<dyn Summarizer>,
    status: Arc<dyn StatusSink>,
    usage: Arc<dyn UsageSink>,
    clock: Arc<dyn Clock>,
}

impl JobProcessor {
    pub fn new(
        orchestrator: TranscriptionOrchestrator,
        summarizer: Arc<dyn Summarizer>,
        status: Arc<dyn StatusSink>,
        usage: Arc<dyn UsageSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orchestrator,
            summarizer,
            status,
            usage,
            clock,
        }
    }

    /// Process one job.
    ///
    /// Every failure path marks the job `Error` before the error is
    /// returned; the marking itself is best-effort.
    pub async fn process(&self, job: &Job) -> Result<TranscriptResult> {
        info!(job = %job.id, language = %job.language, "processing job");
        match self.run_job(job).await {
            Ok(result) => {
                info!(
                    job = %job.id,
                    duration_seconds = result.duration_seconds,
                    "job done"
                );
                Ok(result)
            }
            Err(error) => {
                warn!(job = %job.id, "job failed: {error}");
                let _ = self.status.update(&job.id, StatusUpdate::SetError).await;
                Err(error)
            }
        }
    }

    async fn run_job(&self, job: &Job) -> Result<TranscriptResult> {
        self.status
            .update(&job.id, StatusUpdate::SetProcessing)
            .await?;

        let transcript = self
            .orchestrator
            .run_bytes(&job.audio, job.language)
            .await?;

        // The transcript is the product; a summarizer outage degrades to a
        // placeholder instead of failing the job.
        let summary_text = match self
            .summarizer
            .summarize(&transcript.text, job.language)
            .await
        {
            Ok(text) => text,
            Err(error) => {
                warn!(job = %job.id, "summarization failed, storing placeholder: {error}");
                summary::placeholder(job.language).to_string()
            }
        };

        self.status
            .update(
                &job.id,
                StatusUpdate::SetDone {
                    transcript_text: transcript.text.clone(),
                    summary_text,
                    duration_seconds: transcript.duration_seconds,
                    speaker_count: transcript.total_speaker_count,
                    audio_uri: job.audio_uri.clone(),
                },
            )
            .await?;

        let period = UsagePeriod::containing(self.clock.now());
        self.usage
            .record(&job.owner, period, transcript.duration_seconds)
            .await?;

        Ok(transcript)
    }
}
