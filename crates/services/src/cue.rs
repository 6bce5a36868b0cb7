use remote::AudioClip;

use crate::error::PlaybackError;

/// Local audio output supplied by the host.
pub trait CueSink: Send + Sync {
    /// Start playing `clip`. Must not block until playback ends.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError` if the clip cannot be handed to the audio output.
    fn play(&self, clip: &AudioClip) -> Result<(), PlaybackError>;
}

/// Drops every clip. For headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCueSink;

impl CueSink for SilentCueSink {
    fn play(&self, _clip: &AudioClip) -> Result<(), PlaybackError> {
        Ok(())
    }
}
