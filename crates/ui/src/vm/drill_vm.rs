use alingo_core::DrillAction;
use alingo_core::input::keys_for;
use alingo_core::model::{Outcome, Side, SideColors};
use services::{DrillPhase, DrillSnapshot, DrillTally};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub text: String,
    pub class: String,
    pub key_hint: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrillVm {
    pub left: ChoiceVm,
    pub right: ChoiceVm,
    pub status: &'static str,
    pub banner: Option<String>,
    pub time_up: bool,
    pub can_replay: bool,
    pub show_restart: bool,
    pub tally: String,
}

#[must_use]
pub fn map_drill_snapshot(snapshot: &DrillSnapshot) -> DrillVm {
    let choice = |side: Side| ChoiceVm {
        text: snapshot
            .options
            .as_ref()
            .map(|options| options[side.index()].clone())
            .unwrap_or_default(),
        class: choice_class(snapshot.colors.side(side)),
        key_hint: key_hint(side),
    };

    DrillVm {
        left: choice(Side::Left),
        right: choice(Side::Right),
        status: status_label(snapshot.phase),
        banner: snapshot.banner.clone(),
        time_up: snapshot.time_up,
        can_replay: snapshot.has_cue && snapshot.phase.accepts_guess(),
        show_restart: matches!(snapshot.phase, DrillPhase::Halted | DrillPhase::Exhausted),
        tally: tally_label(snapshot.tally),
    }
}

fn choice_class(colors: SideColors) -> String {
    let mut class = String::from("choice");
    if colors.correct {
        class.push_str(" correct");
    }
    if colors.wrong {
        class.push_str(" wrong");
    }
    class
}

fn key_hint(side: Side) -> String {
    keys_for(DrillAction::Choose(side))
        .map(|key| match key {
            "ArrowLeft" => "←".to_string(),
            "ArrowRight" => "→".to_string(),
            other => other.to_uppercase(),
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

fn status_label(phase: DrillPhase) -> &'static str {
    match phase {
        DrillPhase::Idle => "Choose a course to start",
        DrillPhase::Presenting => "Loading…",
        DrillPhase::AwaitingGuess => "Which one did you hear?",
        DrillPhase::Evaluating => "Checking…",
        DrillPhase::ShowingResult(feedback) => match feedback.outcome {
            Outcome::Correct => "Correct!",
            Outcome::Wrong => "Wrong",
        },
        DrillPhase::TimedOut => "Time's up!",
        DrillPhase::Exhausted => "No more exercises in this course",
        DrillPhase::Halted => "Could not load exercises",
    }
}

fn tally_label(tally: DrillTally) -> String {
    format!(
        "{} correct · {} wrong · {} missed",
        tally.correct, tally.wrong, tally.timed_out
    )
}
