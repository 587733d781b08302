//! Playback configuration

use std::time::Duration;

/// Default grace period after the last sample, giving the device time to
/// drain its buffer before the stream is dropped
const DEFAULT_DRAIN_GRACE: Duration = Duration::from_millis(100);

/// Configuration for the spatial playback driver
///
/// Environment variables (read by [`PlaybackConfig::from_env`]):
///
/// * `WAYCUE_OUTPUT_DEVICE` - output device name; unset means the host default
/// * `WAYCUE_DRAIN_GRACE_MS` - drain grace in milliseconds (default 100)
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Output device name; `None` selects the host default output device
    pub output_device: Option<String>,

    /// Grace period after playback reaches the end of the clip
    pub drain_grace: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            output_device: None,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }
}

impl PlaybackConfig {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let output_device = std::env::var("WAYCUE_OUTPUT_DEVICE")
            .ok()
            .filter(|name| !name.is_empty());

        let drain_grace = std::env::var("WAYCUE_DRAIN_GRACE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(DEFAULT_DRAIN_GRACE, Duration::from_millis);

        Self {
            output_device,
            drain_grace,
        }
    }

    /// Select an output device by name
    #[must_use]
    pub fn with_output_device(mut self, name: impl Into<String>) -> Self {
        self.output_device = Some(name.into());
        self
    }

    /// Set the drain grace period
    #[must_use]
    pub const fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }
}
