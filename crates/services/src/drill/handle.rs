use alingo_core::DrillAction;
use alingo_core::model::CourseId;
use tokio::sync::mpsc;

/// Requests a host can make of a running drill session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillCommand {
    Start(CourseId),
    Input(DrillAction),
    /// Start over with the current course, e.g. after an error.
    Restart,
    Shutdown,
}

/// Cloneable sender side of a session's command channel.
///
/// The session tears itself down once every handle is dropped.
#[derive(Debug, Clone)]
pub struct DrillHandle {
    commands: mpsc::UnboundedSender<DrillCommand>,
}

impl DrillHandle {
    /// Create a handle and the receiver to pass to `DrillMachine::run`.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DrillCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        (Self { commands }, receiver)
    }

    /// Returns `false` if the session is gone.
    pub fn send(&self, command: DrillCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn start(&self, course: CourseId) -> bool {
        self.send(DrillCommand::Start(course))
    }

    pub fn input(&self, action: DrillAction) -> bool {
        self.send(DrillCommand::Input(action))
    }

    pub fn restart(&self) -> bool {
        self.send(DrillCommand::Restart)
    }

    pub fn shutdown(&self) -> bool {
        self.send(DrillCommand::Shutdown)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}
