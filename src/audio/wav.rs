//! WAV decoding and encoding for transcription jobs.

use crate::audio::{AudioBuffer, AudioFormat};
use crate::error::{Result, ScribaError};
use std::io::Cursor;

/// Decodes a WAV byte stream into an [`AudioBuffer`].
///
/// Accepts 16-bit integer and 32-bit float PCM, mono or stereo, at any
/// sample rate. Anything else fails with `Decode`.
pub fn decode(bytes: &[u8]) -> Result<AudioBuffer> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).map_err(|e| ScribaError::Decode {
        message: format!("failed to parse WAV stream: {}", e),
    })?;

    let spec = reader.spec();
    if spec.channels == 0 || spec.channels > 2 {
        return Err(ScribaError::Decode {
            message: format!("unsupported channel count: {}", spec.channels),
        });
    }

    let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| ScribaError::Decode {
                message: format!("failed to read WAV samples: {}", e),
            })?,
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| ScribaError::Decode {
                message: format!("failed to read WAV samples: {}", e),
            })?,
        (_, bits) => {
            return Err(ScribaError::Decode {
                message: format!("unsupported sample format: {} bits per sample", bits),
            });
        }
    };

    Ok(AudioBuffer {
        samples,
        format: AudioFormat {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        },
    })
}

/// Encodes mono 16-bit PCM as an in-memory WAV file.
///
/// Used to package a chunk for upload to the remote service.
pub fn encode(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).map_err(|e| ScribaError::Other(format!(
            "failed to create WAV writer: {}",
            e
        )))?;
    for &s in samples {
        writer
            .write_sample(s)
            .map_err(|e| ScribaError::Other(format!("failed to write WAV sample: {}", e)))?;
    }
    writer
        .finalize()
        .map_err(|e| ScribaError::Other(format!("failed to finalize WAV stream: {}", e)))?;
    Ok(cursor.into_inner())
}

/// Averages interleaved stereo pairs into mono.
pub fn downmix_stereo(samples: &[i16]) -> Vec<i16> {
    samples
        .chunks_exact(2)
        .map(|pair| {
            let left = pair[0] as i32;
            let right = pair[1] as i32;
            ((left + right) / 2) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
