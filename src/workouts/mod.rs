//! Workout templates, playback sequencing, and duration estimation.

pub mod duration;
pub mod reps;
pub mod sequencer;
pub mod store;
pub mod types;

pub use duration::estimate_duration_minutes;
pub use reps::RepTarget;
pub use sequencer::{build_playback_sequence, validate_superset_contiguity, PlaybackStep};
pub use store::WorkoutStore;
pub use types::{Difficulty, Workout, WorkoutError, WorkoutExercise};
