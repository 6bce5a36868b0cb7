use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alingo_core::model::{CourseId, Exercise, ExerciseId, ExercisePage, SoundName, Verdict};
use async_trait::async_trait;

use crate::contract::{AnswerVerifier, AudioClip, CueResolver, ExerciseSource};
use crate::error::RemoteError;

/// A page request as seen by the in-memory source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub course: CourseId,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Default)]
struct CourseState {
    exercises: HashMap<CourseId, Vec<Exercise>>,
    answers: HashMap<ExerciseId, String>,
    clips: HashMap<SoundName, AudioClip>,
    fetch_log: Vec<PageRequest>,
    submissions: Vec<(ExerciseId, String)>,
    fail_pages_from: Option<u32>,
    fail_verifier: bool,
    fail_cues: bool,
}

/// In-memory stand-in for the exercise, answer and sound services.
///
/// Pages are cut from the registered exercises with the requested page size,
/// 0-based like the server. Useful for tests and the offline demo.
#[derive(Clone, Default)]
pub struct InMemoryCourse {
    state: Arc<Mutex<CourseState>>,
}

impl InMemoryCourse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exercise and the answer the server considers correct.
    #[must_use]
    pub fn with_exercise(self, course: CourseId, exercise: Exercise, answer: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.answers.insert(exercise.id(), answer.to_string());
            state.exercises.entry(course).or_default().push(exercise);
        }
        self
    }

    #[must_use]
    pub fn with_clip(self, name: SoundName, content_type: &str, bytes: Vec<u8>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            let clip = AudioClip {
                name: name.clone(),
                content_type: content_type.to_string(),
                bytes,
            };
            state.clips.insert(name, clip);
        }
        self
    }

    /// Make every request for `page` or later fail.
    pub fn fail_pages_from(&self, page: u32) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_pages_from = Some(page);
        }
    }

    pub fn fail_verifier(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_verifier = fail;
        }
    }

    pub fn fail_cues(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_cues = fail;
        }
    }

    #[must_use]
    pub fn fetch_log(&self) -> Vec<PageRequest> {
        self.state
            .lock()
            .map(|state| state.fetch_log.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<(ExerciseId, String)> {
        self.state
            .lock()
            .map(|state| state.submissions.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CourseState>, RemoteError> {
        self.state
            .lock()
            .map_err(|e| RemoteError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ExerciseSource for InMemoryCourse {
    async fn fetch_page(
        &self,
        course: CourseId,
        page: u32,
        page_size: u32,
    ) -> Result<ExercisePage, RemoteError> {
        let mut state = self.lock()?;
        state.fetch_log.push(PageRequest {
            course,
            page,
            page_size,
        });
        if state.fail_pages_from.is_some_and(|from| page >= from) {
            return Err(RemoteError::Unavailable("Exercise service is down".into()));
        }
        let all = state.exercises.get(&course).map_or(&[][..], Vec::as_slice);
        let size = page_size.max(1) as usize;
        let exercises = all
            .iter()
            .skip(page as usize * size)
            .take(size)
            .cloned()
            .collect::<Vec<_>>();
        Ok(ExercisePage {
            size: Some(exercises.len() as u64),
            total_size: Some(all.len() as u64),
            exercises,
            page,
        })
    }
}

#[async_trait]
impl AnswerVerifier for InMemoryCourse {
    async fn submit_guess(
        &self,
        exercise: ExerciseId,
        answer: &str,
    ) -> Result<Verdict, RemoteError> {
        let mut state = self.lock()?;
        state.submissions.push((exercise, answer.to_string()));
        if state.fail_verifier {
            return Err(RemoteError::Unavailable("Answer service is down".into()));
        }
        let correct_answer = state
            .answers
            .get(&exercise)
            .cloned()
            .ok_or_else(|| RemoteError::Unavailable(format!("Exercise {exercise} not found")))?;
        Ok(Verdict::new(answer == correct_answer, correct_answer))
    }
}

#[async_trait]
impl CueResolver for InMemoryCourse {
    async fn resolve_cue(&self, sound: &SoundName) -> Result<AudioClip, RemoteError> {
        let state = self.lock()?;
        if state.fail_cues {
            return Err(RemoteError::Unavailable("Sound service is down".into()));
        }
        state
            .clips
            .get(sound)
            .cloned()
            .ok_or_else(|| RemoteError::Unavailable(format!("Sound {sound} not found")))
    }
}
