//! Retry with exponential backoff for transient remote failures.
//!
//! Only `RemoteUnavailable` is retried; timeouts and rejections escalate
//! immediately. Delays double per attempt, capped, with symmetric jitter so
//! concurrent chunks do not retry in lockstep.

use crate::audio::AudioChunk;
use crate::defaults;
use crate::error::Result;
use crate::language::Language;
use crate::transcribe::client::TranscriptionClient;
use crate::transcribe::types::ChunkResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Backoff tuning for transient failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum retry attempts after the initial call.
    pub max_retries: u32,
    /// Base delay in milliseconds; doubles each attempt.
    pub base_delay_ms: u64,
    /// Ceiling in milliseconds for a single delay.
    pub max_delay_ms: u64,
    /// Jitter factor (0.0 to 1.0); 0.2 varies delays by ±20%.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::MAX_RETRIES,
            base_delay_ms: defaults::BASE_DELAY_MS,
            max_delay_ms: defaults::MAX_DELAY_MS,
            jitter_factor: defaults::JITTER_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// Capped exponential delay in milliseconds for a zero-based attempt,
    /// before jitter.
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let exponential = self.base_delay_ms.saturating_mul(1u64 << attempt.min(31));
        exponential.min(self.max_delay_ms)
    }

    /// Delay with jitter applied from `random` in `[0.0, 1.0)`.
    ///
    /// Jitter maps `random` to a factor in `1.0 ± jitter_factor`.
    pub fn jittered_backoff(&self, attempt: u32, random: f64) -> Duration {
        let capped = self.backoff_ms(attempt) as f64;
        let jitter = 1.0 + (random * 2.0 - 1.0) * self.jitter_factor;
        Duration::from_millis((capped * jitter).round().max(0.0) as u64)
    }
}

/// Wraps a client with retry-with-backoff on transient failures.
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C> RetryingClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<C: TranscriptionClient> TranscriptionClient for RetryingClient<C> {
    async fn transcribe(&self, chunk: &AudioChunk, language: Language) -> Result<ChunkResult> {
        let mut attempt = 0u32;
        loop {
            match self.inner.transcribe(chunk, language).await {
                Ok(result) => return Ok(result),
                Err(error) if error.is_transient() && attempt < self.policy.max_retries => {
                    let delay = self.policy.jittered_backoff(attempt, rand::random::<f64>());
                    warn!(
                        chunk = chunk.index,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "transient transcription failure, retrying: {}",
                        error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
