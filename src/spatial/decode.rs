//! Compressed speech payload decoding
//!
//! TTS providers hand back opaque compressed bytes. This module sniffs
//! the container, decodes to mono PCM, and resamples when the output
//! device cannot run at the clip's native rate.

use std::io::Cursor;

use minimp3::{Decoder, Frame};
use rubato::{FftFixedIn, Resampler};

use crate::{Error, Result};

/// Decoded mono PCM audio ready for playback
///
/// A clip is request-scoped: it is produced for one cue and dropped when
/// that cue finishes.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Source sample rate in Hz
    pub sample_rate: u32,
}

impl AudioClip {
    /// Clip length in milliseconds at the source rate
    ///
    /// A clip with a zero sample rate reports zero duration.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / u64::from(self.sample_rate)
    }
}

/// Decode a compressed speech payload into mono PCM
///
/// Payloads starting with a RIFF header decode as WAV; everything else
/// is treated as MP3. Stereo sources are averaged down to mono.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the payload is not valid WAV or MP3,
/// uses an unsupported sample layout, or contains no audio frames. An
/// empty payload falls in the last category; callers that want to treat
/// it as a no-op should check before decoding.
pub fn decode_clip(payload: &[u8]) -> Result<AudioClip> {
    if payload.starts_with(b"RIFF") {
        return decode_wav(payload);
    }
    decode_mp3(payload)
}

fn decode_wav(payload: &[u8]) -> Result<AudioClip> {
    let reader = hound::WavReader::new(Cursor::new(payload))
        .map_err(|e| Error::Decode(format!("Failed to read WAV header: {e}")))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Decode(format!("Failed to read WAV samples: {e}")))?,
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|s| f32::from(s) / 32768.0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Decode(format!("Failed to read WAV samples: {e}")))?,
        #[allow(clippy::cast_precision_loss)]
        (hound::SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|s| s as f32 / 2_147_483_648.0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Decode(format!("Failed to read WAV samples: {e}")))?,
        (format, bits) => {
            return Err(Error::Decode(format!(
                "Unsupported WAV format: {bits}-bit {format:?}"
            )));
        }
    };

    let samples = match spec.channels {
        1 => samples,
        2 => samples
            .chunks_exact(2)
            .map(|frame| f32::midpoint(frame[0], frame[1]))
            .collect(),
        n => return Err(Error::Decode(format!("Unsupported channel count: {n}"))),
    };

    if samples.is_empty() {
        return Err(Error::Decode("No audio frames in WAV payload".into()));
    }

    tracing::debug!(
        samples = samples.len(),
        sample_rate = spec.sample_rate,
        "decoded WAV payload"
    );

    Ok(AudioClip {
        samples,
        sample_rate: spec.sample_rate,
    })
}

fn decode_mp3(payload: &[u8]) -> Result<AudioClip> {
    let mut decoder = Decoder::new(Cursor::new(payload));
    let mut samples = Vec::new();
    let mut sample_rate = 0_u32;

    loop {
        match decoder.next_frame() {
            Ok(Frame {
                data,
                sample_rate: rate,
                channels,
                ..
            }) => {
                // The first frame fixes the clip rate.
                if sample_rate == 0 {
                    sample_rate = u32::try_from(rate).unwrap_or(0);
                }
                if channels == 2 {
                    for frame in data.chunks_exact(2) {
                        let left = f32::from(frame[0]) / 32768.0;
                        let right = f32::from(frame[1]) / 32768.0;
                        samples.push(f32::midpoint(left, right));
                    }
                } else {
                    samples.extend(data.iter().map(|&s| f32::from(s) / 32768.0));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Decode(format!("Failed to decode MP3 frame: {e}"))),
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(Error::Decode(
            "No decodable audio frames in payload".into(),
        ));
    }

    tracing::debug!(
        samples = samples.len(),
        sample_rate,
        "decoded MP3 payload"
    );

    Ok(AudioClip {
        samples,
        sample_rate,
    })
}

/// Resample mono PCM between rates with an FFT-based resampler
///
/// The final partial chunk is zero-padded so the tail of the clip is not
/// dropped.
pub(crate) fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    const CHUNK: usize = 1024;

    let mut resampler = FftFixedIn::<f64>::new(from_rate as usize, to_rate as usize, CHUNK, 2, 1)
        .map_err(|e| Error::Audio(format!("Failed to create resampler: {e}")))?;

    let mut output = Vec::new();
    for chunk in samples.chunks(CHUNK) {
        let mut frame: Vec<f64> = chunk.iter().map(|&s| f64::from(s)).collect();
        frame.resize(CHUNK, 0.0);
        let processed = resampler
            .process(&[frame], None)
            .map_err(|e| Error::Audio(format!("Failed to resample audio: {e}")))?;
        #[allow(clippy::cast_possible_truncation)]
        output.extend(processed[0].iter().map(|&s| s as f32));
    }

    tracing::debug!(
        input = samples.len(),
        output = output.len(),
        from_rate,
        to_rate,
        "resampled clip"
    );

    Ok(output)
}
