//! Error types for the cue pipeline

use thiserror::Error;

/// Result type alias for waycue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding or playing a cue
#[derive(Debug, Error)]
pub enum Error {
    /// Audio device or stream error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech payload could not be decoded as audio
    #[error("decode error: {0}")]
    Decode(String),
}
