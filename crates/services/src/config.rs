use std::env;
use std::time::Duration;

use tracing::warn;

/// Largest page the exercise service accepts.
pub const MAX_PAGE_SIZE: u32 = 20;

/// Timing and paging knobs of a drill session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrillConfig {
    /// How long the user has to pick an option.
    pub guess_window: Duration,
    /// How long the correct/wrong highlight stays before advancing.
    pub feedback_delay: Duration,
    /// How long the time-up indicator stays before advancing.
    pub time_up_delay: Duration,
    /// Exercises per fetch, at most `MAX_PAGE_SIZE`.
    pub page_size: u32,
    /// Page requested when a session starts. The server counts from 0.
    pub first_page: u32,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            guess_window: Duration::from_millis(5000),
            feedback_delay: Duration::from_millis(500),
            time_up_delay: Duration::from_millis(1500),
            page_size: 10,
            first_page: 0,
        }
    }
}

impl DrillConfig {
    /// Defaults overridden by `ALINGO_GUESS_WINDOW_MS`, `ALINGO_FEEDBACK_DELAY_MS`,
    /// `ALINGO_TIME_UP_DELAY_MS` and `ALINGO_PAGE_SIZE`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an explicit variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(ms) = parse_positive(&lookup, "ALINGO_GUESS_WINDOW_MS") {
            config.guess_window = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_positive(&lookup, "ALINGO_FEEDBACK_DELAY_MS") {
            config.feedback_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_positive(&lookup, "ALINGO_TIME_UP_DELAY_MS") {
            config.time_up_delay = Duration::from_millis(ms);
        }
        if let Some(size) = parse_positive(&lookup, "ALINGO_PAGE_SIZE") {
            config.page_size = clamp_page_size(size);
        }
        config
    }
}

fn clamp_page_size(size: u64) -> u32 {
    match u32::try_from(size) {
        Ok(size) if size <= MAX_PAGE_SIZE => size,
        _ => {
            warn!(size, max = MAX_PAGE_SIZE, "page size above server limit; clamping");
            MAX_PAGE_SIZE
        }
    }
}

fn parse_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(key, raw = %raw, "ignoring invalid drill setting");
            None
        }
    }
}
