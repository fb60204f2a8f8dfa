//! Chunk transcription: the remote-service client, its retry wrapper, and
//! the per-chunk result types.
//!
//! The orchestrator only sees the [`TranscriptionClient`] trait; the HTTP
//! client, the retry layer, and the test mock are interchangeable behind it.

pub mod client;
pub mod remote;
pub mod retry;
pub mod types;

pub use client::{MockFailure, MockTranscriptionClient, TranscriptionClient};
pub use remote::{RemoteConfig, RemoteTranscriptionClient};
pub use retry::{RetryPolicy, RetryingClient};
pub use types::{ChunkResult, WordSpan};
