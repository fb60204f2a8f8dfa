//! Windowed loudness analysis for silence-based cut points.
//!
//! The silence threshold adapts to the recording: it sits a fixed number of
//! dB below the buffer's overall loudness. Comparison happens in the linear
//! RMS domain; lowering by N dB multiplies the RMS threshold by 10^(-N/20).

use crate::defaults;

/// A run of sub-threshold audio, in sample indices (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilenceSpan {
    pub start: usize,
    pub end: usize,
}

/// Calculates RMS energy of audio samples, normalized to 0.0..1.0.
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = sample as f64 / i16::MAX as f64;
            normalized * normalized
        })
        .sum();

    let mean_square = sum_squares / samples.len() as f64;
    mean_square.sqrt() as f32
}

/// Detects silence intervals of at least `min_silence_ms`.
///
/// The buffer is scanned in fixed 10ms windows; a window is silent when its
/// RMS falls at least `margin_db` below the whole buffer's RMS. Runs of
/// silent windows shorter than the minimum are ignored. Returned spans are
/// ordered and disjoint.
pub fn detect_silence(
    samples: &[i16],
    sample_rate: u32,
    min_silence_ms: u64,
    margin_db: f32,
) -> Vec<SilenceSpan> {
    let window = (sample_rate as u64 * defaults::SILENCE_WINDOW_MS / 1000) as usize;
    if samples.is_empty() || window == 0 {
        return Vec::new();
    }

    let buffer_rms = calculate_rms(samples);
    let threshold = buffer_rms * db_ratio(-margin_db);
    let min_silence_samples = (sample_rate as u64 * min_silence_ms / 1000) as usize;

    let mut spans = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut pos = 0usize;

    for win in samples.chunks(window) {
        if calculate_rms(win) <= threshold {
            if run_start.is_none() {
                run_start = Some(pos);
            }
        } else if let Some(start) = run_start.take()
            && pos - start >= min_silence_samples
        {
            spans.push(SilenceSpan { start, end: pos });
        }
        pos += win.len();
    }

    if let Some(start) = run_start
        && pos - start >= min_silence_samples
    {
        spans.push(SilenceSpan { start, end: pos });
    }

    spans
}

fn db_ratio(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}
