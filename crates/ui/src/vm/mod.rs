mod drill_vm;

pub use drill_vm::{ChoiceVm, DrillVm, map_drill_snapshot};
