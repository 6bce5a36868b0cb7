#![forbid(unsafe_code)]

pub mod contract;
pub mod error;
pub mod http;
pub mod memory;

pub use contract::{AnswerVerifier, AudioClip, CueResolver, ExerciseSource, Remote};
pub use error::RemoteError;
pub use http::{ApiConfig, HttpApi};
pub use memory::{InMemoryCourse, PageRequest};
