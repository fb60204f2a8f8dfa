//! scriba - Diarized transcription for long-form meeting audio
//!
//! Splits recordings on silence, transcribes chunks concurrently against a
//! remote recognition service, and assembles one speaker-labelled transcript.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod assemble;
pub mod audio;
pub mod config;
pub mod defaults;
pub mod error;
pub mod job;
pub mod language;
pub mod orchestrate;
pub mod segment;
pub mod summary;
pub mod transcribe;

// Core pipeline (segment → transcribe → assemble)
pub use assemble::{TranscriptAssembler, TranscriptResult};
pub use orchestrate::{OrchestratorConfig, TranscriptionOrchestrator};
pub use segment::{AudioSegmenter, SegmenterConfig};
pub use transcribe::{
    ChunkResult, MockTranscriptionClient, RemoteConfig, RemoteTranscriptionClient, RetryPolicy,
    RetryingClient, TranscriptionClient, WordSpan,
};

// Job processing around the pipeline
pub use job::{
    Job, JobId, JobProcessor, JobStatus, OwnerId, StatusSink, StatusUpdate, UsagePeriod, UsageSink,
};
pub use summary::{ExtractiveSummarizer, Summarizer};

// Error handling
pub use error::{Result, ScribaError};

// Config
pub use config::Config;

// Audio decode (for callers that segment without the orchestrator)
pub use audio::{AudioBuffer, AudioChunk, AudioFormat};
pub use language::Language;
