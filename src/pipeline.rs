//! Cue orchestration
//!
//! Ties direction inference to spatial playback: a scene description and
//! its spoken rendering come in, a panned playback goes out.

use crate::Result;
use crate::spatial::{Pan, PlaybackHandle, SpatialPlayback, infer_pan};

/// One scene cue: what the scene looks like and how it sounds
///
/// Value object scoped to a single request; nothing about it is shared
/// or global.
#[derive(Debug, Clone)]
pub struct SceneCue {
    /// Natural-language scene description from the vision provider
    pub description: String,
    /// Compressed speech rendering of the description
    pub speech: Vec<u8>,
}

impl SceneCue {
    /// Bundle a description with its spoken rendering
    #[must_use]
    pub fn new(description: impl Into<String>, speech: Vec<u8>) -> Self {
        Self {
            description: description.into(),
            speech,
        }
    }
}

/// Result of dispatching a cue
#[derive(Debug)]
pub struct CueOutcome {
    /// Pan inferred from the description
    pub pan: Pan,
    /// Handle to the running playback; absent when the payload was empty
    pub playback: Option<PlaybackHandle>,
}

/// Dispatches cues, keeping at most one playback sounding at a time
#[derive(Debug, Default)]
pub struct CuePipeline {
    playback: SpatialPlayback,
    current: Option<PlaybackHandle>,
}

impl CuePipeline {
    /// Create a pipeline around the given playback driver
    #[must_use]
    pub const fn new(playback: SpatialPlayback) -> Self {
        Self {
            playback,
            current: None,
        }
    }

    /// Infer a pan from the cue's description and start playing its speech
    ///
    /// A cue arriving while an earlier one is still sounding stops the
    /// earlier one first; a stale direction would mislead the listener.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decode`] for an undecodable payload and
    /// [`crate::Error::Audio`] for device or stream failures.
    pub async fn dispatch(&mut self, cue: SceneCue) -> Result<CueOutcome> {
        let pan = infer_pan(&cue.description);

        tracing::info!(
            pan = pan.value(),
            speech_bytes = cue.speech.len(),
            description = %cue.description,
            "dispatching scene cue"
        );

        self.interrupt();

        let playback = self.playback.play(cue.speech, pan).await?;
        self.current.clone_from(&playback);

        Ok(CueOutcome { pan, playback })
    }

    /// Stop the currently sounding cue, if any
    pub fn interrupt(&mut self) {
        if let Some(handle) = self.current.take()
            && !handle.is_finished()
        {
            tracing::debug!("interrupting in-flight cue");
            handle.stop();
        }
    }

    /// Whether the most recently dispatched cue is still sounding
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
