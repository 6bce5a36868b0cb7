use std::future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// What a countdown is for; handed back when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// The user ran out of time to pick an option.
    GuessWindow,
    /// Feedback has been shown long enough; move to the next exercise.
    Advance,
    /// The time-up indicator has been shown long enough.
    TimeUpAcknowledge,
}

/// Identifies one arming of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy)]
struct Armed {
    token: TimerToken,
    purpose: TimerPurpose,
    deadline: Instant,
}

/// A single-slot cancellable delay.
///
/// There is one slot: arming replaces whatever was armed before, so two
/// countdowns can never be live at once and a replaced one can never fire.
#[derive(Debug, Default)]
pub struct CountdownTimer {
    slot: Option<Armed>,
    next_token: u64,
}

impl CountdownTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `purpose` to fire after `duration`, cancelling any armed countdown.
    pub fn arm(&mut self, duration: Duration, purpose: TimerPurpose) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.slot = Some(Armed {
            token,
            purpose,
            deadline: Instant::now() + duration,
        });
        token
    }

    /// Cancel the armed countdown. A no-op when nothing is armed.
    pub fn cancel(&mut self) {
        self.slot = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    #[must_use]
    pub fn armed(&self) -> Option<(TimerToken, TimerPurpose)> {
        self.slot.map(|armed| (armed.token, armed.purpose))
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.slot.map(|armed| armed.deadline)
    }

    /// Wait for the armed countdown and disarm it.
    ///
    /// Pends forever while nothing is armed. Cancel safe: dropping the future
    /// before the deadline leaves the countdown armed.
    pub async fn wait(&mut self) -> TimerPurpose {
        let Some(armed) = self.slot else {
            return future::pending().await;
        };
        sleep_until(armed.deadline).await;
        self.slot = None;
        armed.purpose
    }
}
