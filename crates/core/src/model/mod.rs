mod exercise;
mod ids;
mod verdict;

pub use ids::{CourseId, ExerciseId, ParseIdError, SoundName};

pub use exercise::{Exercise, ExerciseError, ExercisePage, Side};
pub use verdict::{Colors, Feedback, Outcome, SideColors, Verdict};
