//! Equal-power stereo panning
//!
//! Maps a [`Pan`] position to a fixed per-channel gain pair. The
//! equal-power law keeps perceived loudness constant across the stereo
//! field: at the extremes one channel is fully attenuated, at center
//! both channels sit at -3 dB.

use std::f32::consts::FRAC_PI_2;

use super::direction::Pan;

/// Per-channel gains for one stereo position
///
/// Gains are fixed at construction; a cue keeps a single position for
/// its whole duration.
#[derive(Debug, Clone, Copy)]
pub struct StereoPanner {
    gain_left: f32,
    gain_right: f32,
}

impl StereoPanner {
    /// Compute channel gains for the given pan position
    #[must_use]
    pub fn new(pan: Pan) -> Self {
        // Map [-1, 1] onto [0, pi/2] and split the quarter circle
        // between the two channels.
        let angle = f32::midpoint(pan.value(), 1.0) * FRAC_PI_2;
        Self {
            gain_left: angle.cos(),
            gain_right: angle.sin(),
        }
    }

    /// Gain applied to the left channel
    #[must_use]
    pub const fn gain_left(self) -> f32 {
        self.gain_left
    }

    /// Gain applied to the right channel
    #[must_use]
    pub const fn gain_right(self) -> f32 {
        self.gain_right
    }

    /// Expand one mono sample into a panned stereo frame
    #[must_use]
    pub const fn frame(self, sample: f32) -> [f32; 2] {
        [sample * self.gain_left, sample * self.gain_right]
    }
}
