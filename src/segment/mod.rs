//! Audio segmentation: bounded-duration chunks cut at silence.
//!
//! The remote transcription service caps the audio length it accepts per
//! request, so long recordings are split before upload. Cuts land inside
//! silence intervals to avoid splitting words or speaker turns; a fixed
//! trailing pad of silence stays with the preceding segment. Chunks are
//! contiguous, non-overlapping, and cover every sample of the recording.

use crate::audio::{AudioBuffer, AudioChunk, silence};
use crate::defaults;
use serde::{Deserialize, Serialize};

/// Tuning for silence detection and chunk packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Hard upper bound on chunk duration in seconds.
    pub max_chunk_secs: u64,
    /// Minimum silence length in milliseconds for a cut candidate.
    pub min_silence_ms: u64,
    /// Silence threshold margin in dB below the recording's mean loudness.
    pub silence_margin_db: f32,
    /// Trailing silence in milliseconds kept with the preceding segment.
    pub keep_silence_ms: u64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_chunk_secs: defaults::MAX_CHUNK_SECS,
            min_silence_ms: defaults::MIN_SILENCE_MS,
            silence_margin_db: defaults::SILENCE_MARGIN_DB,
            keep_silence_ms: defaults::KEEP_SILENCE_MS,
        }
    }
}

/// Splits decoded audio into bounded-duration chunks.
///
/// Pure computation: no I/O, no state shared across calls.
pub struct AudioSegmenter {
    config: SegmenterConfig,
}

impl AudioSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Splits `audio` into ordered chunks no longer than the configured
    /// maximum.
    ///
    /// The buffer is normalized to 16kHz mono first. Audio at or under the
    /// maximum comes back as a single chunk with no silence analysis. Longer
    /// audio is cut inside detected silence intervals (each cut sits
    /// `keep_silence_ms` into the interval, so the preceding segment keeps
    /// its trailing pad) and the resulting segments are packed greedily
    /// first-fit. A segment with no usable silence inside is hard-cut at
    /// exact maximum-duration boundaries rather than emitted oversized; a
    /// recording with no silence at all therefore still yields bounded
    /// chunks. An empty buffer yields no chunks.
    pub fn split(&self, audio: &AudioBuffer) -> Vec<AudioChunk> {
        let normalized = audio.to_mono_rate(defaults::SAMPLE_RATE);
        let format = normalized.format;
        let samples = normalized.samples;
        if samples.is_empty() {
            return Vec::new();
        }

        let max_samples = (self.config.max_chunk_secs * format.sample_rate as u64) as usize;
        if max_samples == 0 || samples.len() <= max_samples {
            return vec![AudioChunk {
                index: 0,
                samples,
                format,
            }];
        }

        let cuts = self.cut_points(&samples, format.sample_rate);
        let segments = segment_spans(samples.len(), &cuts);
        pack_segments(&segments, max_samples)
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| AudioChunk {
                index: i as u64,
                samples: samples[start..end].to_vec(),
                format,
            })
            .collect()
    }

    /// One cut per silence interval, `keep_silence_ms` into it.
    ///
    /// The rest of the interval leads the next segment. Cuts at the very
    /// start or end of the buffer would produce empty segments and are
    /// dropped.
    fn cut_points(&self, samples: &[i16], sample_rate: u32) -> Vec<usize> {
        let spans = silence::detect_silence(
            samples,
            sample_rate,
            self.config.min_silence_ms,
            self.config.silence_margin_db,
        );
        let keep = (sample_rate as u64 * self.config.keep_silence_ms / 1000) as usize;

        let mut cuts = Vec::with_capacity(spans.len());
        for span in spans {
            let cut = (span.start + keep).min(span.end);
            if cut > 0 && cut < samples.len() {
                cuts.push(cut);
            }
        }
        cuts
    }
}

/// Partitions `[0, len)` at the given ascending cut points.
fn segment_spans(len: usize, cuts: &[usize]) -> Vec<(usize, usize)> {
    let mut spans = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0usize;
    for &cut in cuts {
        if cut > start {
            spans.push((start, cut));
            start = cut;
        }
    }
    if len > start {
        spans.push((start, len));
    }
    spans
}

/// First-fit packing of contiguous segments into chunk spans of at most
/// `max_samples`.
///
/// Consecutive segments accumulate while they fit; a segment that would
/// overflow closes the current chunk and starts the next. A single segment
/// longer than the budget is cut at exact `max_samples` boundaries and its
/// tail re-enters packing.
fn pack_segments(segments: &[(usize, usize)], max_samples: usize) -> Vec<(usize, usize)> {
    let mut chunks = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    for &(start, end) in segments {
        let mut seg_start = start;

        if let Some((cur_start, cur_end)) = current {
            // Segments are contiguous, so the combined span is end - cur_start
            if end - cur_start <= max_samples {
                current = Some((cur_start, end));
                continue;
            }
            chunks.push((cur_start, cur_end));
            current = None;
        }

        while end - seg_start > max_samples {
            chunks.push((seg_start, seg_start + max_samples));
            seg_start += max_samples;
        }
        if end > seg_start {
            current = Some((seg_start, end));
        }
    }

    if let Some(span) = current {
        chunks.push(span);
    }
    chunks
}
