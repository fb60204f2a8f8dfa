//! Chunk transcription capability and test double.

use crate::audio::AudioChunk;
use crate::error::{Result, ScribaError};
use crate::language::Language;
use crate::transcribe::types::ChunkResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Capability to transcribe one audio chunk.
///
/// This trait allows swapping implementations (real remote service vs mock).
/// Implementations must be safe to call concurrently for different chunks;
/// no state is shared mutably across in-flight calls.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    /// Transcribes one chunk with word-level timestamps and diarization.
    ///
    /// Suspends until the remote service finishes or the configured wait
    /// deadline lapses. The returned result carries the chunk's index.
    async fn transcribe(&self, chunk: &AudioChunk, language: Language) -> Result<ChunkResult>;
}

/// Implement TranscriptionClient for Arc<T> to allow sharing across tasks.
#[async_trait]
impl<T: TranscriptionClient + ?Sized> TranscriptionClient for Arc<T> {
    async fn transcribe(&self, chunk: &AudioChunk, language: Language) -> Result<ChunkResult> {
        (**self).transcribe(chunk, language).await
    }
}

/// Failure a mock transcription call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Unavailable,
    Timeout,
    Rejected,
}

impl MockFailure {
    fn to_error(self) -> ScribaError {
        match self {
            MockFailure::Unavailable => ScribaError::RemoteUnavailable {
                message: "mock service unavailable".to_string(),
            },
            MockFailure::Timeout => ScribaError::RemoteTimeout { seconds: 1 },
            MockFailure::Rejected => ScribaError::RemoteRejected {
                message: "mock rejection".to_string(),
            },
        }
    }
}

/// Mock client for testing.
///
/// Responds per chunk index: configured results come back as-is, configured
/// failures produce the matching error, and unconfigured indices echo an
/// empty result.
#[derive(Debug, Default)]
pub struct MockTranscriptionClient {
    responses: Mutex<HashMap<u64, ChunkResult>>,
    failures: Mutex<HashMap<u64, MockFailure>>,
    calls: AtomicU32,
}

impl MockTranscriptionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the result returned for its `chunk_index`.
    pub fn with_result(self, result: ChunkResult) -> Self {
        {
            let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
            responses.insert(result.chunk_index, result);
        }
        self
    }

    /// Configure a failure for the given chunk index.
    pub fn with_failure(self, chunk_index: u64, failure: MockFailure) -> Self {
        {
            let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
            failures.insert(chunk_index, failure);
        }
        self
    }

    /// Number of transcribe calls made so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionClient for MockTranscriptionClient {
    async fn transcribe(&self, chunk: &AudioChunk, _language: Language) -> Result<ChunkResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failure = {
            let failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
            failures.get(&chunk.index).copied()
        };
        if let Some(failure) = failure {
            return Err(failure.to_error());
        }

        let responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        Ok(responses
            .get(&chunk.index)
            .cloned()
            .unwrap_or_else(|| ChunkResult::empty(chunk.index)))
    }
}
