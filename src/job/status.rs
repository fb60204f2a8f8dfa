//! Job status reporting.
//!
//! Updates form a closed set of variants rather than ad-hoc field writes, so
//! a sink implementation can exhaustively match on what changed.

use crate::error::Result;
use crate::job::JobId;
use async_trait::async_trait;
use std::sync::Mutex;

/// Lifecycle states of a transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Error,
}

/// One status transition, carrying the fields that transition writes.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    SetProcessing,
    SetDone {
        transcript_text: String,
        summary_text: String,
        duration_seconds: u64,
        speaker_count: u32,
        audio_uri: String,
    },
    SetError,
}

impl StatusUpdate {
    /// The status a job lands in after this update.
    pub fn status(&self) -> JobStatus {
        match self {
            StatusUpdate::SetProcessing => JobStatus::Processing,
            StatusUpdate::SetDone { .. } => JobStatus::Done,
            StatusUpdate::SetError => JobStatus::Error,
        }
    }
}

/// Receives status transitions for durable recording.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn update(&self, job: &JobId, update: StatusUpdate) -> Result<()>;
}

/// In-memory sink recording updates in arrival order.
#[derive(Default)]
pub struct MemoryStatusSink {
    updates: Mutex<Vec<(JobId, StatusUpdate)>>,
}

impl MemoryStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates recorded so far.
    pub fn updates(&self) -> Vec<(JobId, StatusUpdate)> {
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The status sequence recorded for one job.
    pub fn statuses_for(&self, job: &JobId) -> Vec<JobStatus> {
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(id, _)| id == job)
            .map(|(_, update)| update.status())
            .collect()
    }
}

#[async_trait]
impl StatusSink for MemoryStatusSink {
    async fn update(&self, job: &JobId, update: StatusUpdate) -> Result<()> {
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((job.clone(), update));
        Ok(())
    }
}
