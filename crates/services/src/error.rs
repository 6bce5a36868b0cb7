//! Shared error types for the services crate.

use thiserror::Error;

use remote::RemoteError;

/// Failures of a drill session, each translated from a collaborator call.
///
/// Running out of exercises is not an error; see `BufferState::Exhausted`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DrillError {
    #[error("exercise source unavailable: {0}")]
    SourceUnavailable(#[source] RemoteError),
    #[error("answer verifier unavailable: {0}")]
    VerifierUnavailable(#[source] RemoteError),
    #[error("audio cue unavailable: {0}")]
    CueUnavailable(#[source] RemoteError),
    #[error("no course selected")]
    NoCourse,
}

impl DrillError {
    /// Message shown in the error banner.
    #[must_use]
    pub fn banner(&self) -> String {
        match self {
            DrillError::SourceUnavailable(err)
            | DrillError::VerifierUnavailable(err)
            | DrillError::CueUnavailable(err) => err.message(),
            DrillError::NoCourse => self.to_string(),
        }
    }
}

/// A clip could not be played by the host's audio output.
#[derive(Debug, Error)]
#[error("audio playback failed: {0}")]
pub struct PlaybackError(pub String);
