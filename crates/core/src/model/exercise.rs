use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ExerciseId, SoundName};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("exercise {id} has {count} options, expected 2")]
    OptionCount { id: ExerciseId, count: usize },
}

//
// ─── SIDE ─────────────────────────────────────────────────────────────────────
//

/// Position of a choice in the two-choice prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

//
// ─── EXERCISE ─────────────────────────────────────────────────────────────────
//

/// One binary-choice prompt as served by the exercise endpoint.
///
/// Option order is significant: `options[0]` is always rendered on the left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExerciseWire", into = "ExerciseWire")]
pub struct Exercise {
    id: ExerciseId,
    options: [String; 2],
    sound: Option<SoundName>,
}

impl Exercise {
    #[must_use]
    pub fn new(
        id: ExerciseId,
        left: impl Into<String>,
        right: impl Into<String>,
        sound: Option<SoundName>,
    ) -> Self {
        Self {
            id,
            options: [left.into(), right.into()],
            sound,
        }
    }

    #[must_use]
    pub fn id(&self) -> ExerciseId {
        self.id
    }

    #[must_use]
    pub fn options(&self) -> &[String; 2] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, side: Side) -> &str {
        &self.options[side.index()]
    }

    #[must_use]
    pub fn sound(&self) -> Option<&SoundName> {
        self.sound.as_ref()
    }

    /// Side on which `text` is displayed.
    ///
    /// Only the left option is compared; any other text maps to the right side.
    #[must_use]
    pub fn side_of(&self, text: &str) -> Side {
        if text == self.options[0] {
            Side::Left
        } else {
            Side::Right
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseWire {
    id: ExerciseId,
    options: Vec<String>,
    #[serde(default)]
    sound_filename: Option<String>,
}

impl TryFrom<ExerciseWire> for Exercise {
    type Error = ExerciseError;

    fn try_from(wire: ExerciseWire) -> Result<Self, Self::Error> {
        let count = wire.options.len();
        let options: [String; 2] = wire
            .options
            .try_into()
            .map_err(|_| ExerciseError::OptionCount { id: wire.id, count })?;
        // Blank file names are treated as "no cue".
        let sound = wire
            .sound_filename
            .and_then(|name| SoundName::new(name).ok());
        Ok(Self {
            id: wire.id,
            options,
            sound,
        })
    }
}

impl From<Exercise> for ExerciseWire {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: exercise.id,
            options: exercise.options.into(),
            sound_filename: exercise.sound.map(String::from),
        }
    }
}

//
// ─── PAGE ─────────────────────────────────────────────────────────────────────
//

/// A batch of exercises together with the page number it was served as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePage {
    pub exercises: Vec<Exercise>,
    pub page: u32,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub total_size: Option<u64>,
}

impl ExercisePage {
    #[must_use]
    pub fn new(page: u32, exercises: Vec<Exercise>) -> Self {
        Self {
            exercises,
            page,
            size: None,
            total_size: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
