//! Default configuration constants for scriba.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Pipeline audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition; the remote service requires
/// it, so all decoded audio is resampled to this rate before analysis.
pub const SAMPLE_RATE: u32 = 16000;

/// Default maximum chunk duration in seconds.
///
/// The remote transcription service caps the audio length it accepts per
/// request; 300s (5 minutes) stays under that cap with headroom.
pub const MAX_CHUNK_SECS: u64 = 300;

/// Default minimum silence duration in milliseconds for a cut candidate.
///
/// Gaps shorter than 1000ms are treated as natural pauses within speech and
/// never used as chunk boundaries.
pub const MIN_SILENCE_MS: u64 = 1000;

/// Default silence threshold margin in dB below the buffer's mean loudness.
///
/// A window is silent when its level falls at least this far under the
/// recording's overall loudness, which adapts the threshold to quiet and
/// loud recordings alike.
pub const SILENCE_MARGIN_DB: f32 = 14.0;

/// Default trailing silence in milliseconds kept with the preceding segment.
///
/// Cutting this far into a silence interval leaves a pad after the last word
/// so word endings are not clipped at chunk boundaries.
pub const KEEP_SILENCE_MS: u64 = 500;

/// RMS analysis window length in milliseconds.
///
/// Silence boundaries are resolved at this granularity; 10ms is fine enough
/// for 1s-minimum silence intervals.
pub const SILENCE_WINDOW_MS: u64 = 10;

/// Default ceiling in seconds for one remote recognition job.
///
/// Long recordings can take the service minutes to process; 900s matches the
/// service's own long-running-operation limit.
pub const WAIT_TIMEOUT_SECS: u64 = 900;

/// Default interval in milliseconds between remote operation polls.
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Minimum speaker count hint sent to the diarization service.
pub const MIN_SPEAKERS: u32 = 1;

/// Default maximum speaker count hint sent to the diarization service.
///
/// Bounds the diarization search; meetings rarely exceed ten active speakers.
pub const MAX_SPEAKERS: u32 = 10;

/// Default maximum number of chunk transcriptions in flight at once.
///
/// Caps pressure on the remote service and local memory; chunks beyond this
/// wait for a permit.
pub const MAX_IN_FLIGHT: usize = 4;

/// Default maximum retry attempts for transient remote failures.
pub const MAX_RETRIES: u32 = 5;

/// Default base delay in milliseconds for exponential backoff.
pub const BASE_DELAY_MS: u64 = 1000;

/// Default ceiling in milliseconds for a single backoff delay.
pub const MAX_DELAY_MS: u64 = 60_000;

/// Default jitter factor applied to backoff delays (0.0 to 1.0).
///
/// Spreads concurrent retries apart so they do not hit the service in
/// lockstep.
pub const JITTER_FACTOR: f64 = 0.2;
