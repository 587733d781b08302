//! Shared test utilities

/// Generate sine wave audio samples
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sine_samples(
    sample_rate: u32,
    frequency: f32,
    duration_secs: f32,
    amplitude: f32,
) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Encode mono f32 samples as a 16-bit WAV payload
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn wav_payload(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("failed to create WAV writer");
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer.write_sample(value).expect("failed to write sample");
    }
    writer.finalize().expect("failed to finalize WAV");
    cursor.into_inner()
}

/// A short spoken-cue stand-in: 440 Hz tone encoded as WAV
#[must_use]
pub fn tone_payload(sample_rate: u32, duration_secs: f32) -> Vec<u8> {
    let samples = sine_samples(sample_rate, 440.0, duration_secs, 0.4);
    wav_payload(&samples, sample_rate)
}
