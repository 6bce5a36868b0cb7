use alingo_core::model::{Colors, ExerciseId, Feedback, Outcome};

/// Where the drill currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrillPhase {
    #[default]
    Idle,
    /// Loading or announcing the next exercise.
    Presenting,
    AwaitingGuess,
    /// A guess is with the verifier.
    Evaluating,
    ShowingResult(Feedback),
    TimedOut,
    /// The course has no more exercises.
    Exhausted,
    /// Fetching exercises failed; only a restart continues.
    Halted,
}

impl DrillPhase {
    #[must_use]
    pub fn accepts_guess(self) -> bool {
        matches!(self, DrillPhase::AwaitingGuess)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DrillPhase::Idle => "idle",
            DrillPhase::Presenting => "presenting",
            DrillPhase::AwaitingGuess => "awaiting-guess",
            DrillPhase::Evaluating => "evaluating",
            DrillPhase::ShowingResult(_) => "showing-result",
            DrillPhase::TimedOut => "timed-out",
            DrillPhase::Exhausted => "exhausted",
            DrillPhase::Halted => "halted",
        }
    }
}

/// Per-session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrillTally {
    pub presented: u32,
    pub correct: u32,
    pub wrong: u32,
    pub timed_out: u32,
}

impl DrillTally {
    pub(crate) fn record(&mut self, feedback: Feedback) {
        match feedback.outcome {
            Outcome::Correct => self.correct = self.correct.saturating_add(1),
            Outcome::Wrong => self.wrong = self.wrong.saturating_add(1),
        }
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.correct.saturating_add(self.wrong)
    }
}

/// Everything a view needs to render the drill, published after each transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrillSnapshot {
    pub phase: DrillPhase,
    pub exercise: Option<ExerciseId>,
    pub options: Option<[String; 2]>,
    pub has_cue: bool,
    pub colors: Colors,
    pub time_up: bool,
    pub banner: Option<String>,
    pub tally: DrillTally,
}
