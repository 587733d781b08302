//! Direction inference from scene descriptions
//!
//! Vision providers describe object positions with clock-face idioms
//! ("coffee mug at 2 o'clock"). This module maps those phrases to a
//! horizontal pan value for stereo playback.

use std::sync::LazyLock;

use regex::Regex;

/// Pan offset applied when a directional clock phrase is found
const CUE_PAN: f32 = 0.6;

/// Clock positions on the listener's right (2, 3, 4 o'clock)
static RIGHT_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:2|3|4)\s+o['’]clock\b").expect("valid regex")
});

/// Clock positions on the listener's left (8, 9, 10 o'clock)
static LEFT_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:8|9|10)\s+o['’]clock\b").expect("valid regex")
});

/// Horizontal stereo position in the closed range [-1.0, 1.0]
///
/// -1.0 is full left, 0.0 center, 1.0 full right.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pan(f32);

impl Pan {
    /// Fully left
    pub const HARD_LEFT: Self = Self(-1.0);

    /// Centered between both channels
    pub const CENTER: Self = Self(0.0);

    /// Fully right
    pub const HARD_RIGHT: Self = Self(1.0);

    /// Create a pan value, clamping to [-1.0, 1.0]
    ///
    /// NaN maps to center.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::CENTER;
        }
        Self(value.clamp(-1.0, 1.0))
    }

    /// The raw pan scalar
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Derive a pan value from the clock-position phrases in a description
///
/// Right-side positions (2, 3, 4 o'clock) pan right, left-side positions
/// (8, 9, 10 o'clock) pan left, anything else is center. The right branch
/// is checked first, so a description mentioning both sides pans right.
/// Matching is case-insensitive and tolerates arbitrary text; there is no
/// failure mode.
#[must_use]
pub fn infer_pan(description: &str) -> Pan {
    if RIGHT_CLOCK.is_match(description) {
        return Pan::new(CUE_PAN);
    }
    if LEFT_CLOCK.is_match(description) {
        return Pan::new(-CUE_PAN);
    }
    Pan::CENTER
}
