use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use alingo_core::DrillAction;
use alingo_core::model::{Colors, CourseId, Exercise, Feedback, Side, SoundName, Verdict};
use remote::{AnswerVerifier, AudioClip, CueResolver, Remote};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::handle::DrillCommand;
use super::view::{DrillPhase, DrillSnapshot, DrillTally};
use crate::buffer::{BufferState, SessionBuffer};
use crate::config::DrillConfig;
use crate::cue::CueSink;
use crate::error::DrillError;
use crate::timer::{CountdownTimer, TimerPurpose};

/// The exercise on screen and the audio resolved for it.
struct Presentation {
    exercise: Exercise,
    clip: Option<AudioClip>,
}

enum Event {
    Command(DrillCommand),
    Timer(TimerPurpose),
}

/// Queue a command that arrived while the machine was busy.
///
/// Only one guess is kept, and only while a guess is accepted; other input is
/// meaningless once the phase has moved on.
fn defer_while_busy(
    deferred: &mut VecDeque<DrillCommand>,
    command: DrillCommand,
    phases: &watch::Receiver<DrillSnapshot>,
) {
    if let DrillCommand::Input(action) = command {
        let phase = phases.borrow().phase;
        let guess_queued = deferred
            .iter()
            .any(|queued| matches!(queued, DrillCommand::Input(DrillAction::Choose(_))));
        let duplicate_guess = matches!(action, DrillAction::Choose(_)) && guess_queued;
        if !phase.accepts_guess() || duplicate_guess {
            debug!(?action, phase = phase.label(), "dropping input received while busy");
            return;
        }
    }
    deferred.push_back(command);
}

/// Sequences one drill session: present, count down, verify, show feedback, advance.
///
/// All session state lives here and is only mutated from `&mut self`, one
/// event at a time. The countdown is a single slot, so a replaced or
/// cancelled countdown can never fire into a later phase.
pub struct DrillMachine {
    config: DrillConfig,
    buffer: SessionBuffer,
    verifier: Arc<dyn AnswerVerifier>,
    cues: Arc<dyn CueResolver>,
    sink: Arc<dyn CueSink>,
    timer: CountdownTimer,
    phase: DrillPhase,
    presented: Option<Presentation>,
    colors: Colors,
    banner: Option<String>,
    tally: DrillTally,
    torn_down: bool,
    snapshots: watch::Sender<DrillSnapshot>,
}

impl DrillMachine {
    #[must_use]
    pub fn new(remote: &Remote, sink: Arc<dyn CueSink>, config: DrillConfig) -> Self {
        let buffer = SessionBuffer::new(
            Arc::clone(&remote.exercises),
            config.page_size,
            config.first_page,
        );
        let (snapshots, _) = watch::channel(DrillSnapshot::default());
        Self {
            config,
            buffer,
            verifier: Arc::clone(&remote.verifier),
            cues: Arc::clone(&remote.cues),
            sink,
            timer: CountdownTimer::new(),
            phase: DrillPhase::Idle,
            presented: None,
            colors: Colors::default(),
            banner: None,
            tally: DrillTally::default(),
            torn_down: false,
            snapshots,
        }
    }

    /// Receiver of the snapshot published after every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DrillSnapshot> {
        self.snapshots.subscribe()
    }

    #[must_use]
    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.presented.as_ref().map(|p| &p.exercise)
    }

    #[must_use]
    pub fn colors(&self) -> Colors {
        self.colors
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    #[must_use]
    pub fn tally(&self) -> DrillTally {
        self.tally
    }

    #[must_use]
    pub fn buffer(&self) -> &SessionBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    pub fn snapshot(&self) -> DrillSnapshot {
        DrillSnapshot {
            phase: self.phase,
            exercise: self.presented.as_ref().map(|p| p.exercise.id()),
            options: self.presented.as_ref().map(|p| p.exercise.options().clone()),
            has_cue: self
                .presented
                .as_ref()
                .is_some_and(|p| p.exercise.sound().is_some()),
            colors: self.colors,
            time_up: self.phase == DrillPhase::TimedOut,
            banner: self.banner.clone(),
            tally: self.tally,
        }
    }

    /// Process commands and countdowns until shutdown or until every handle is dropped.
    ///
    /// Commands keep being read while a remote call is in flight: a shutdown
    /// ends the session at once, and an input that arrives while no guess is
    /// accepted is dropped instead of being applied to a later exercise.
    /// Responses still in flight when the loop ends are dropped unread.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<DrillCommand>) {
        let phases = self.snapshots.subscribe();
        let mut deferred = VecDeque::new();

        loop {
            let event = match deferred.pop_front() {
                Some(command) => Event::Command(command),
                None => tokio::select! {
                    command = commands.recv() => match command {
                        Some(DrillCommand::Shutdown) | None => break,
                        Some(command) => Event::Command(command),
                    },
                    purpose = self.timer.wait() => Event::Timer(purpose),
                },
            };

            let work = self.apply(event);
            tokio::pin!(work);
            let shutdown = loop {
                tokio::select! {
                    biased;
                    () = &mut work => break false,
                    command = commands.recv() => match command {
                        Some(DrillCommand::Shutdown) | None => break true,
                        Some(command) => defer_while_busy(&mut deferred, command, &phases),
                    },
                }
            };
            if shutdown {
                break;
            }
        }
        self.teardown();
    }

    async fn apply(&mut self, event: Event) {
        match event {
            Event::Command(command) => self.dispatch(command).await,
            Event::Timer(purpose) => self.on_timer(purpose).await,
        }
    }

    /// Apply one host command.
    pub async fn dispatch(&mut self, command: DrillCommand) {
        match command {
            DrillCommand::Start(course) => self.start(course).await,
            DrillCommand::Input(action) => self.input(action).await,
            DrillCommand::Restart => self.restart().await,
            DrillCommand::Shutdown => self.teardown(),
        }
    }

    /// Begin a fresh session on `course` and present its first exercise.
    pub async fn start(&mut self, course: CourseId) {
        if self.torn_down {
            return;
        }
        self.timer.cancel();
        self.presented = None;
        self.colors.clear();
        self.banner = None;
        self.tally = DrillTally::default();
        self.phase = DrillPhase::Presenting;
        self.publish();

        info!(%course, "drill session starting");
        let loaded = self.buffer.start(course).await;
        self.after_load(loaded).await;
    }

    /// Start over with the course of the current session.
    pub async fn restart(&mut self) {
        match self.buffer.course() {
            Some(course) => self.start(course).await,
            None => debug!("restart requested before any course was chosen"),
        }
    }

    /// Apply a user action. Actions that do not fit the current phase are ignored.
    pub async fn input(&mut self, action: DrillAction) {
        if self.torn_down {
            return;
        }
        match action {
            DrillAction::Choose(side) if self.phase.accepts_guess() => self.guess(side).await,
            DrillAction::Choose(side) => {
                debug!(?side, phase = self.phase.label(), "ignoring guess");
            }
            DrillAction::ReplayCue if self.phase.accepts_guess() => self.replay_cue().await,
            DrillAction::Acknowledge if self.phase == DrillPhase::TimedOut => {
                self.timer.cancel();
                self.next().await;
            }
            DrillAction::ReplayCue | DrillAction::Acknowledge => {}
        }
    }

    /// Wait for the armed countdown; pends forever while none is armed.
    pub async fn next_timer(&mut self) -> TimerPurpose {
        self.timer.wait().await
    }

    /// React to a fired countdown.
    pub async fn on_timer(&mut self, purpose: TimerPurpose) {
        if self.torn_down {
            return;
        }
        match (purpose, self.phase) {
            (TimerPurpose::GuessWindow, DrillPhase::AwaitingGuess) => {
                info!("guess window elapsed");
                self.tally.timed_out = self.tally.timed_out.saturating_add(1);
                self.phase = DrillPhase::TimedOut;
                self.timer
                    .arm(self.config.time_up_delay, TimerPurpose::TimeUpAcknowledge);
                self.publish();
            }
            (TimerPurpose::Advance, DrillPhase::ShowingResult(_))
            | (TimerPurpose::TimeUpAcknowledge, DrillPhase::TimedOut) => self.next().await,
            (purpose, phase) => {
                debug!(?purpose, phase = phase.label(), "ignoring countdown");
            }
        }
    }

    /// Cancel the countdown and stop reacting to anything.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        info!("drill session torn down");
        self.timer.cancel();
        self.torn_down = true;
        self.presented = None;
        self.colors.clear();
        self.phase = DrillPhase::Idle;
        self.publish();
    }

    async fn after_load(&mut self, loaded: Result<BufferState, DrillError>) {
        match loaded {
            Ok(BufferState::Ready) => self.present().await,
            Ok(BufferState::Exhausted) => self.exhaust(),
            Err(err) => self.halt(&err),
        }
    }

    async fn present(&mut self) {
        let Some(exercise) = self.buffer.current().cloned() else {
            self.exhaust();
            return;
        };
        debug!(exercise = %exercise.id(), "presenting exercise");
        let sound = exercise.sound().cloned();
        self.presented = Some(Presentation {
            exercise,
            clip: None,
        });
        self.colors.clear();
        self.tally.presented = self.tally.presented.saturating_add(1);
        self.phase = DrillPhase::Presenting;
        self.publish();

        // The cue is advisory: the countdown starts whether or not it plays.
        if let Some(sound) = sound {
            let clip = self.resolve_and_play(&sound).await;
            if let Some(presentation) = self.presented.as_mut() {
                presentation.clip = clip;
            }
        }

        self.timer
            .arm(self.config.guess_window, TimerPurpose::GuessWindow);
        self.phase = DrillPhase::AwaitingGuess;
        self.publish();
    }

    async fn resolve_and_play(&self, sound: &SoundName) -> Option<AudioClip> {
        match self.cues.resolve_cue(sound).await {
            Ok(clip) => {
                self.play(&clip);
                Some(clip)
            }
            Err(err) => {
                let err = DrillError::CueUnavailable(err);
                warn!(%sound, error = %err, "continuing without cue");
                None
            }
        }
    }

    fn play(&self, clip: &AudioClip) {
        if let Err(err) = self.sink.play(clip) {
            warn!(sound = %clip.name, error = %err, "cue playback failed");
        }
    }

    async fn replay_cue(&mut self) {
        let Some(presentation) = self.presented.as_ref() else {
            return;
        };
        if let Some(clip) = &presentation.clip {
            self.play(clip);
            return;
        }
        let Some(sound) = presentation.exercise.sound().cloned() else {
            return;
        };
        let clip = self.resolve_and_play(&sound).await;
        if let Some(presentation) = self.presented.as_mut() {
            presentation.clip = clip;
        }
    }

    async fn guess(&mut self, side: Side) {
        // Capture what is submitted before the first await.
        let Some((exercise_id, answer)) = self
            .presented
            .as_ref()
            .map(|p| (p.exercise.id(), p.exercise.option(side).to_string()))
        else {
            return;
        };

        self.timer.cancel();
        self.banner = None;
        self.phase = DrillPhase::Evaluating;
        self.publish();
        debug!(exercise = %exercise_id, ?side, "submitting guess");

        match self.verifier.submit_guess(exercise_id, &answer).await {
            Ok(verdict) => self.show_result(&verdict),
            Err(err) => {
                let err = DrillError::VerifierUnavailable(err);
                warn!(exercise = %exercise_id, error = %err, "guess not verified");
                // Same exercise stays up for a retry; no countdown until then.
                self.banner = Some(err.banner());
                self.phase = DrillPhase::AwaitingGuess;
                self.publish();
            }
        }
    }

    fn show_result(&mut self, verdict: &Verdict) {
        // Resolve against the exercise still on screen, before any advance.
        let Some(presentation) = self.presented.as_ref() else {
            return;
        };
        let feedback = Feedback::resolve(&presentation.exercise, verdict);
        debug!(?feedback, "verdict received");
        self.colors = Colors::from_feedback(feedback);
        self.tally.record(feedback);
        self.phase = DrillPhase::ShowingResult(feedback);
        self.timer
            .arm(self.config.feedback_delay, TimerPurpose::Advance);
        self.publish();
    }

    async fn next(&mut self) {
        self.presented = None;
        self.colors.clear();
        self.phase = DrillPhase::Presenting;
        self.publish();
        let advanced = self.buffer.advance().await;
        self.after_load(advanced).await;
    }

    fn exhaust(&mut self) {
        info!(tally = ?self.tally, "no more exercises");
        self.timer.cancel();
        self.presented = None;
        self.phase = DrillPhase::Exhausted;
        self.publish();
    }

    fn halt(&mut self, err: &DrillError) {
        warn!(error = %err, "drill halted");
        self.timer.cancel();
        self.presented = None;
        self.banner = Some(err.banner());
        self.phase = DrillPhase::Halted;
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

impl fmt::Debug for DrillMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrillMachine")
            .field("phase", &self.phase)
            .field("buffer", &self.buffer)
            .field("timer", &self.timer)
            .field("tally", &self.tally)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}
