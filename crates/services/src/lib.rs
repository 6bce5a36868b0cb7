#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod cue;
pub mod drill;
pub mod error;
pub mod timer;

pub use buffer::{BufferState, SessionBuffer};
pub use config::{DrillConfig, MAX_PAGE_SIZE};
pub use cue::{CueSink, SilentCueSink};
pub use error::{DrillError, PlaybackError};
pub use timer::{CountdownTimer, TimerPurpose, TimerToken};

pub use drill::{DrillCommand, DrillHandle, DrillMachine, DrillPhase, DrillSnapshot, DrillTally};
