//! Client roster, assignments, and session history.

pub mod store;
pub mod types;

pub use store::ClientStore;
pub use types::{
    Client, ClientError, ClientExercise, ClientWorkout, LoggedExercise, Measurement, SetLog,
    WorkoutLog,
};
