//! Drives one recording through the full pipeline.
//!
//! ```text
//! ┌─────────┐    ┌────────────┐    ┌──────────────┐    ┌───────────┐
//! │ Decode  │───▶│ Segmenter  │───▶│ Transcribe   │───▶│ Assembler │───▶ TranscriptResult
//! │ (WAV)   │    │ (silence)  │    │ (concurrent) │    │ (rebase)  │
//! └─────────┘    └────────────┘    └──────────────┘    └───────────┘
//! ```
//!
//! Chunks are transcribed concurrently under a semaphore bound and collected
//! by index. The first fatal chunk error fails the whole run and aborts the
//! remaining in-flight calls; no partial transcript is ever returned.

use crate::assemble::{TranscriptAssembler, TranscriptResult};
use crate::audio::AudioBuffer;
use crate::defaults;
use crate::error::{Result, ScribaError};
use crate::language::Language;
use crate::segment::AudioSegmenter;
use crate::transcribe::client::TranscriptionClient;
use crate::transcribe::types::ChunkResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument};

/// Concurrency settings for a transcription run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum chunks in flight against the remote service.
    pub max_in_flight: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_in_flight: defaults::MAX_IN_FLIGHT,
        }
    }
}

/// Coordinates segmentation, concurrent transcription, and assembly.
pub struct TranscriptionOrchestrator {
    segmenter: AudioSegmenter,
    client: Arc<dyn TranscriptionClient>,
    assembler: TranscriptAssembler,
    config: OrchestratorConfig,
}

impl TranscriptionOrchestrator {
    pub fn new(
        segmenter: AudioSegmenter,
        client: Arc<dyn TranscriptionClient>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            segmenter,
            client,
            assembler: TranscriptAssembler::new(),
            config,
        }
    }

    /// Decode raw WAV bytes and transcribe the recording.
    pub async fn run_bytes(&self, audio: &[u8], language: Language) -> Result<TranscriptResult> {
        let buffer = AudioBuffer::decode(audio)?;
        self.run(&buffer, language).await
    }

    /// Transcribe a decoded recording.
    ///
    /// Dropping the returned future aborts all in-flight chunk calls; the
    /// run cannot be resumed.
    #[instrument(skip_all, fields(language = %language))]
    pub async fn run(&self, audio: &AudioBuffer, language: Language) -> Result<TranscriptResult> {
        let chunks = self.segmenter.split(audio);
        if chunks.is_empty() {
            return Ok(TranscriptResult::empty());
        }
        let chunk_count = chunks.len();
        info!(
            chunks = chunk_count,
            seconds = audio.duration_secs(),
            "dispatching chunks for transcription"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut tasks: JoinSet<Result<ChunkResult>> = JoinSet::new();

        for chunk in chunks {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| {
                    ScribaError::Other(format!("transcription dispatch stopped: {e}"))
                })?;
                client.transcribe(&chunk, language).await
            });
        }

        // Completion order is arbitrary; the map restores index order.
        let mut collected: BTreeMap<u64, ChunkResult> = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| ScribaError::Other(format!("transcription task failed: {e}")))?;
            match outcome {
                Ok(result) => {
                    collected.insert(result.chunk_index, result);
                }
                Err(error) => {
                    tasks.abort_all();
                    return Err(error);
                }
            }
        }

        let ordered: Vec<ChunkResult> = collected.into_values().collect();
        // A duplicate index would collapse in the map and drop a chunk's audio.
        if ordered.len() != chunk_count {
            return Err(ScribaError::Assembly {
                message: format!(
                    "expected {chunk_count} chunk results, collected {}",
                    ordered.len()
                ),
            });
        }
        let transcript = self.assembler.merge(&ordered)?;
        info!(
            duration_seconds = transcript.duration_seconds,
            speakers = transcript.total_speaker_count,
            "transcription complete"
        );
        Ok(transcript)
    }
}
