//! Spatial audio playback to speakers
//!
//! Decodes a speech payload off the async runtime, then plays it through
//! a stereo output stream with fixed per-channel gains. cpal streams
//! aren't `Send`, so each playback runs on its own thread; callers get a
//! [`PlaybackHandle`] to stop it or await its end.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SampleRate, SupportedStreamConfig, SupportedStreamConfigRange};
use tokio::sync::{oneshot, watch};

use crate::config::PlaybackConfig;
use crate::{Error, Result};

use super::decode::{AudioClip, decode_clip, resample};
use super::direction::Pan;
use super::panner::StereoPanner;

/// Poll interval while waiting for a stream to finish
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Plays decoded speech clips through a panned stereo stream
///
/// Construction is cheap and touches no audio hardware; devices are
/// resolved per playback.
#[derive(Debug, Clone, Default)]
pub struct SpatialPlayback {
    config: PlaybackConfig,
}

/// Handle to one in-flight playback
///
/// Cloneable; all clones control the same stream.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    stop: Arc<AtomicBool>,
    done: watch::Receiver<bool>,
}

impl PlaybackHandle {
    /// Stop playback as soon as possible
    ///
    /// Idempotent; stopping a finished playback is a no-op. The output
    /// goes silent on the next audio callback and the stream is torn
    /// down within one poll interval.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Whether the stream has been torn down
    #[must_use]
    pub fn is_finished(&self) -> bool {
        *self.done.borrow()
    }

    /// Wait until the stream is torn down
    pub async fn finished(&mut self) {
        // A dropped sender means the playback thread is gone.
        let _ = self.done.wait_for(|done| *done).await;
    }
}

impl SpatialPlayback {
    /// Create a playback driver with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a playback driver with the given configuration
    #[must_use]
    pub const fn with_config(config: PlaybackConfig) -> Self {
        Self { config }
    }

    /// Decode a speech payload and start playing it at the given pan
    ///
    /// Decoding runs on the blocking pool; playback runs on a dedicated
    /// thread. The call resolves once the stream has started (or failed
    /// to), not when the clip ends, so playback is fire-and-forget. An
    /// empty payload is a silent no-op and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the payload is not decodable audio
    /// and [`Error::Audio`] when no suitable output device or stream is
    /// available.
    pub async fn play(&self, speech: Vec<u8>, pan: Pan) -> Result<Option<PlaybackHandle>> {
        if speech.is_empty() {
            tracing::debug!("empty speech payload, nothing to play");
            return Ok(None);
        }

        let clip = tokio::task::spawn_blocking(move || decode_clip(&speech))
            .await
            .map_err(|e| Error::Audio(format!("decode task failed: {e}")))??;

        let panner = StereoPanner::new(pan);
        tracing::debug!(
            pan = pan.value(),
            samples = clip.samples.len(),
            sample_rate = clip.sample_rate,
            "starting spatial playback"
        );

        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = oneshot::channel();
        let (done_tx, done_rx) = watch::channel(false);

        let thread_stop = Arc::clone(&stop);
        let device_name = self.config.output_device.clone();
        let drain_grace = self.config.drain_grace;

        std::thread::spawn(move || {
            match open_stream(clip, panner, &thread_stop, device_name.as_deref()) {
                Ok((stream, finished, duration_ms)) => {
                    let _ = ready_tx.send(Ok(()));
                    wait_for_playback(&finished, &thread_stop, duration_ms, drain_grace);
                    drop(stream);
                    tracing::debug!("playback stream closed");
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            }
            let _ = done_tx.send(true);
        });

        ready_rx
            .await
            .map_err(|_| Error::Audio("playback thread exited before start".to_string()))??;

        Ok(Some(PlaybackHandle {
            stop,
            done: done_rx,
        }))
    }
}

/// Open a stereo output stream and start feeding it the clip
///
/// Returns the live stream, the completion flag set by the audio
/// callback, and the clip duration at the stream rate.
fn open_stream(
    clip: AudioClip,
    panner: StereoPanner,
    stop: &Arc<AtomicBool>,
    device_name: Option<&str>,
) -> Result<(cpal::Stream, Arc<Mutex<bool>>, u64)> {
    let host = cpal::default_host();
    let device = select_device(&host, device_name)?;
    let supported = select_config(&device, clip.sample_rate)?;

    let stream_rate = supported.sample_rate().0;
    let config = supported.config();
    let samples = if stream_rate == clip.sample_rate {
        clip.samples
    } else {
        resample(&clip.samples, clip.sample_rate, stream_rate)?
    };

    let duration_ms = (samples.len() as u64 * 1000) / u64::from(stream_rate);

    let samples = Arc::new(Mutex::new(samples));
    let position = Arc::new(Mutex::new(0_usize));
    let finished = Arc::new(Mutex::new(false));

    let samples_clone = Arc::clone(&samples);
    let position_clone = Arc::clone(&position);
    let finished_clone = Arc::clone(&finished);
    let stop_clone = Arc::clone(stop);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if stop_clone.load(Ordering::Relaxed) {
                    data.fill(0.0);
                    return;
                }

                let samples = samples_clone.lock().unwrap();
                let mut pos = position_clone.lock().unwrap();

                for frame in data.chunks_mut(2) {
                    let sample = if *pos < samples.len() {
                        samples[*pos]
                    } else {
                        *finished_clone.lock().unwrap() = true;
                        0.0
                    };

                    if let [left, right] = frame {
                        [*left, *right] = panner.frame(sample);
                    }

                    if *pos < samples.len() {
                        *pos += 1;
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio output stream error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    tracing::debug!(
        device = device.name().unwrap_or_default(),
        sample_rate = stream_rate,
        duration_ms,
        "spatial stream started"
    );

    Ok((stream, finished, duration_ms))
}

/// Block until the clip has played out, the stop flag is set, or the
/// timeout passes
fn wait_for_playback(
    finished: &Mutex<bool>,
    stop: &AtomicBool,
    duration_ms: u64,
    drain_grace: Duration,
) {
    let start = Instant::now();
    let timeout = Duration::from_millis(duration_ms + 500);

    while !*finished.lock().unwrap() && !stop.load(Ordering::Relaxed) {
        if start.elapsed() > timeout {
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    // Let the device drain buffered frames on a natural end.
    if !stop.load(Ordering::Relaxed) {
        std::thread::sleep(drain_grace);
    }
}

fn select_device(host: &cpal::Host, name: Option<&str>) -> Result<Device> {
    if let Some(name) = name {
        let mut devices = host
            .output_devices()
            .map_err(|e| Error::Audio(e.to_string()))?;
        return devices
            .find(|d| d.name().is_ok_and(|n| n == name))
            .ok_or_else(|| Error::Audio(format!("output device not found: {name}")));
    }

    host.default_output_device()
        .ok_or_else(|| Error::Audio("no output device available".to_string()))
}

fn select_config(device: &Device, clip_rate: u32) -> Result<SupportedStreamConfig> {
    let ranges: Vec<SupportedStreamConfigRange> = device
        .supported_output_configs()
        .map_err(|e| Error::Audio(e.to_string()))?
        .filter(|c| c.channels() == 2)
        .collect();

    pick_stereo_config(&ranges, clip_rate)
}

/// Pick a stereo config, preferring `f32` ranges at the clip's native rate
///
/// The output callback writes `f32` frames, so `f32` ranges come first;
/// integer-format ranges are a last resort and may still be rejected when
/// the stream is built.
fn pick_stereo_config(
    ranges: &[SupportedStreamConfigRange],
    clip_rate: u32,
) -> Result<SupportedStreamConfig> {
    let rate = SampleRate(clip_rate);
    let covers = |c: &SupportedStreamConfigRange| {
        c.min_sample_rate() <= rate && c.max_sample_rate() >= rate
    };
    let is_f32 = |c: &SupportedStreamConfigRange| c.sample_format() == SampleFormat::F32;

    if let Some(config) = ranges.iter().find(|c| is_f32(c) && covers(c)) {
        return Ok(config.with_sample_rate(rate));
    }

    // Fallback: f32 at the device's top rate, resampling the clip.
    if let Some(config) = ranges.iter().find(|c| is_f32(c)) {
        return Ok(config.with_max_sample_rate());
    }

    if let Some(config) = ranges.iter().find(|c| covers(c)) {
        return Ok(config.with_sample_rate(rate));
    }

    ranges
        .first()
        .map(|c| c.with_max_sample_rate())
        .ok_or_else(|| Error::Audio("no stereo output config found".to_string()))
}

#[cfg(test)]
mod tests {
    use cpal::SupportedBufferSize;

    use super::*;

    fn stereo_range(min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            2,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn test_config_prefers_f32_at_clip_rate() {
        let ranges = vec![
            stereo_range(8000, 96000, SampleFormat::I16),
            stereo_range(8000, 96000, SampleFormat::F32),
        ];

        let config = pick_stereo_config(&ranges, 24000).expect("stereo config");
        assert_eq!(config.sample_format(), SampleFormat::F32);
        assert_eq!(config.sample_rate(), SampleRate(24000));
    }

    #[test]
    fn test_config_resamples_onto_f32_range() {
        // The i16 range covers the clip rate, but f32 wins even at the
        // cost of a resample.
        let ranges = vec![
            stereo_range(8000, 96000, SampleFormat::I16),
            stereo_range(48000, 48000, SampleFormat::F32),
        ];

        let config = pick_stereo_config(&ranges, 24000).expect("stereo config");
        assert_eq!(config.sample_format(), SampleFormat::F32);
        assert_eq!(config.sample_rate(), SampleRate(48000));
    }

    #[test]
    fn test_config_falls_back_to_integer_format() {
        let ranges = vec![stereo_range(8000, 96000, SampleFormat::I16)];

        let config = pick_stereo_config(&ranges, 24000).expect("stereo config");
        assert_eq!(config.sample_format(), SampleFormat::I16);
        assert_eq!(config.sample_rate(), SampleRate(24000));
    }

    #[test]
    fn test_config_error_without_stereo_ranges() {
        let result = pick_stereo_config(&[], 24000);
        assert!(matches!(result, Err(Error::Audio(_))));
    }

    #[tokio::test]
    async fn test_empty_payload_is_silent_noop() {
        let playback = SpatialPlayback::new();
        let handle = playback
            .play(Vec::new(), Pan::new(0.6))
            .await
            .expect("empty payload must not error");
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let playback = SpatialPlayback::new();
        let result = playback.play(vec![0x01, 0x02, 0x03], Pan::CENTER).await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_handle_stop_is_idempotent() {
        let (_done_tx, done) = watch::channel(false);
        let handle = PlaybackHandle {
            stop: Arc::new(AtomicBool::new(false)),
            done,
        };

        handle.stop();
        handle.stop();
        assert!(handle.stop.load(Ordering::Relaxed));
        assert!(!handle.is_finished());
    }

    #[tokio::test]
    async fn test_handle_finished_after_done_signal() {
        let (done_tx, done) = watch::channel(false);
        let mut handle = PlaybackHandle {
            stop: Arc::new(AtomicBool::new(false)),
            done,
        };

        done_tx.send(true).expect("receiver alive");
        handle.finished().await;
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_handle_finished_when_thread_gone() {
        let (done_tx, done) = watch::channel(false);
        let mut handle = PlaybackHandle {
            stop: Arc::new(AtomicBool::new(false)),
            done,
        };

        drop(done_tx);
        // Must resolve rather than hang when the sender is gone.
        handle.finished().await;
    }
}
