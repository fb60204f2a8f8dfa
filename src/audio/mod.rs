//! Audio decoding and loudness analysis for the segmentation pipeline.

pub mod silence;
pub mod wav;

pub use silence::{SilenceSpan, calculate_rms, detect_silence};
pub use wav::decode;

/// Sample rate and channel layout of a PCM buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Interleaved channel count (1 or 2).
    pub channels: u16,
}

impl AudioFormat {
    /// Mono format at the given sample rate.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
        }
    }
}

/// A decoded recording: interleaved 16-bit PCM plus its format.
///
/// Immutable once decoded; normalization produces a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub format: AudioFormat,
}

impl AudioBuffer {
    /// Decodes a WAV byte stream. Fails with `Decode` on anything else.
    pub fn decode(bytes: &[u8]) -> crate::error::Result<Self> {
        wav::decode(bytes)
    }

    /// Total duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let frames = self.samples.len() as f64 / self.format.channels as f64;
        frames / self.format.sample_rate as f64
    }

    /// Returns a mono copy of this buffer at the given sample rate.
    ///
    /// Stereo downmixes by averaging channel pairs; rate conversion uses
    /// linear interpolation.
    pub fn to_mono_rate(&self, target_rate: u32) -> AudioBuffer {
        let mono = if self.format.channels == 2 {
            wav::downmix_stereo(&self.samples)
        } else {
            self.samples.clone()
        };
        let samples = if self.format.sample_rate != target_rate {
            wav::resample(&mono, self.format.sample_rate, target_rate)
        } else {
            mono
        };
        AudioBuffer {
            samples,
            format: AudioFormat::mono(target_rate),
        }
    }
}

/// One bounded-duration slice of the original recording, the unit of work
/// sent to the remote transcription service.
///
/// Indices are a contiguous 0-based sequence; assembly depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub index: u64,
    pub samples: Vec<i16>,
    pub format: AudioFormat,
}

impl AudioChunk {
    /// Duration of this chunk in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let frames = self.samples.len() as f64 / self.format.channels as f64;
        frames / self.format.sample_rate as f64
    }
}
