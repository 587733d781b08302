//! Spatial cue pipeline: direction inference, panning, playback

mod decode;
mod direction;
mod panner;
mod playback;

pub use decode::{AudioClip, decode_clip};
pub use direction::{Pan, infer_pan};
pub use panner::StereoPanner;
pub use playback::{PlaybackHandle, SpatialPlayback};
