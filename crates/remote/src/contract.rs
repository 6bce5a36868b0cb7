use std::fmt;
use std::sync::Arc;

use alingo_core::model::{CourseId, ExerciseId, ExercisePage, SoundName, Verdict};
use async_trait::async_trait;

use crate::error::RemoteError;
use crate::http::{ApiConfig, HttpApi};
use crate::memory::InMemoryCourse;

/// Playable audio for one cue.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub name: SoundName,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioClip")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Paged stream of exercises for a course.
#[async_trait]
pub trait ExerciseSource: Send + Sync {
    /// Fetch one page of exercises.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport or server failure.
    async fn fetch_page(
        &self,
        course: CourseId,
        page: u32,
        page_size: u32,
    ) -> Result<ExercisePage, RemoteError>;
}

/// Server-side judge of guesses. The client never evaluates answers itself.
#[async_trait]
pub trait AnswerVerifier: Send + Sync {
    /// Submit `answer` for `exercise`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport or server failure.
    async fn submit_guess(&self, exercise: ExerciseId, answer: &str)
    -> Result<Verdict, RemoteError>;
}

#[async_trait]
pub trait CueResolver: Send + Sync {
    /// Download the audio for a sound file name.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the clip cannot be fetched.
    async fn resolve_cue(&self, sound: &SoundName) -> Result<AudioClip, RemoteError>;
}

/// The three collaborators of a drill session behind trait objects.
#[derive(Clone)]
pub struct Remote {
    pub exercises: Arc<dyn ExerciseSource>,
    pub verifier: Arc<dyn AnswerVerifier>,
    pub cues: Arc<dyn CueResolver>,
}

impl Remote {
    /// # Errors
    ///
    /// Returns `RemoteError` if the HTTP client cannot be built.
    pub fn http(config: ApiConfig) -> Result<Self, RemoteError> {
        let api = Arc::new(HttpApi::new(config)?);
        Ok(Self {
            exercises: api.clone(),
            verifier: api.clone(),
            cues: api,
        })
    }

    #[must_use]
    pub fn in_memory(course: InMemoryCourse) -> Self {
        Self {
            exercises: Arc::new(course.clone()),
            verifier: Arc::new(course.clone()),
            cues: Arc::new(course),
        }
    }
}
