#![forbid(unsafe_code)]

pub mod input;
pub mod model;

pub use input::{DrillAction, action_for_key};
