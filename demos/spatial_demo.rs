//! Play a spoken cue with the pan inferred from its description
//!
//! ```text
//! cargo run --example spatial_demo -- <audio-file> "<description>"
//! ```
//!
//! The audio file may be WAV or MP3, e.g. a TTS rendering of the
//! description. Honors `WAYCUE_OUTPUT_DEVICE` and `WAYCUE_DRAIN_GRACE_MS`.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use waycue::{CuePipeline, PlaybackConfig, SceneCue, SpatialPlayback};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let audio_path = args
        .next()
        .context("usage: spatial_demo <audio-file> \"<description>\"")?;
    let description = args
        .next()
        .unwrap_or_else(|| "Obstacle at 3 o'clock.".to_string());

    let speech = std::fs::read(&audio_path)
        .with_context(|| format!("failed to read {audio_path}"))?;

    let playback = SpatialPlayback::with_config(PlaybackConfig::from_env());
    let mut pipeline = CuePipeline::new(playback);

    let outcome = pipeline
        .dispatch(SceneCue::new(description, speech))
        .await?;
    tracing::info!(pan = outcome.pan.value(), "cue dispatched");

    if let Some(mut handle) = outcome.playback {
        handle.finished().await;
    }

    Ok(())
}
