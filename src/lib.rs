//! Waycue - Spatial audio cues for AI vision assistants
//!
//! This library provides the core cue pipeline for a wearable scene
//! narrator:
//! - Direction inference from clock-position phrases in scene descriptions
//! - Equal-power stereo panning with a fixed position per clip
//! - Compressed speech decoding and fire-and-forget playback
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  CuePipeline                     │
//! │   description ──► infer_pan ───► Pan             │
//! │   speech bytes ─► decode_clip ─► AudioClip       │
//! └────────────────────┬─────────────────────────────┘
//!                      │
//! ┌────────────────────▼─────────────────────────────┐
//! │                SpatialPlayback                   │
//! │   StereoPanner │ cpal stream │ PlaybackHandle    │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod spatial;

pub use config::PlaybackConfig;
pub use error::{Error, Result};
pub use pipeline::{CueOutcome, CuePipeline, SceneCue};
pub use spatial::{
    AudioClip, Pan, PlaybackHandle, SpatialPlayback, StereoPanner, decode_clip, infer_pan,
};
