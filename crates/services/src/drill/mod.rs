mod handle;
mod machine;
mod view;

// Public API of the drill subsystem.
pub use handle::{DrillCommand, DrillHandle};
pub use machine::DrillMachine;
pub use view::{DrillPhase, DrillSnapshot, DrillTally};
