use serde::{Deserialize, Serialize};

use crate::model::exercise::{Exercise, Side};

/// The server's judgement of a submitted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub correct: bool,
    pub correct_answer: String,
}

impl Verdict {
    #[must_use]
    pub fn new(correct: bool, correct_answer: impl Into<String>) -> Self {
        Self {
            correct,
            correct_answer: correct_answer.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
}

/// A verdict interpreted against the exercise that is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub outcome: Outcome,
    /// Side whose text equals the verdict's correct answer.
    pub correct_side: Side,
}

impl Feedback {
    /// Resolve which side the verdict refers to.
    ///
    /// Must be called with the exercise the guess was made on; the verdict
    /// carries only the answer text, so any other exercise yields a wrong side.
    /// Exercises whose two options share the same text always resolve left.
    #[must_use]
    pub fn resolve(exercise: &Exercise, verdict: &Verdict) -> Self {
        let outcome = if verdict.correct {
            Outcome::Correct
        } else {
            Outcome::Wrong
        };
        Self {
            outcome,
            correct_side: exercise.side_of(&verdict.correct_answer),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideColors {
    pub correct: bool,
    pub wrong: bool,
}

/// Highlight flags for both sides of the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Colors {
    pub left: SideColors,
    pub right: SideColors,
}

impl Colors {
    /// A correct guess lights the correct side; a wrong guess marks the rejected side.
    #[must_use]
    pub fn from_feedback(feedback: Feedback) -> Self {
        let mut colors = Self::default();
        match feedback.outcome {
            Outcome::Correct => colors.side_mut(feedback.correct_side).correct = true,
            Outcome::Wrong => colors.side_mut(feedback.correct_side.opposite()).wrong = true,
        }
        colors
    }

    #[must_use]
    pub fn side(&self, side: Side) -> SideColors {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideColors {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}
