mod drill;
#[cfg(test)]
mod view_smoke;

pub use drill::{DrillPanel, DrillView};
