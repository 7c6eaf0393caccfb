//! Session state types.

use thiserror::Error;

use crate::exercises::library::LibraryError;

/// Lifecycle of a live training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Sets are being worked through.
    InProgress,
    /// The closing log has been built; the session is read-only.
    Finished,
}

/// Countdown between sets.
///
/// Purely advisory: it never gates set completion, it only tells the
/// caller how long to rest. `total_time` grows with extensions so a
/// progress display keeps its denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestTimer {
    pub active: bool,
    pub time_left: u32,
    pub total_time: u32,
}

impl RestTimer {
    pub fn start(&mut self, seconds: u32) {
        self.active = true;
        self.time_left = seconds;
        self.total_time = seconds;
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.time_left = 0;
        self.total_time = 0;
    }

    /// Count down one second. Deactivates on reaching zero.
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.active = false;
        }
    }

    pub fn extend(&mut self, seconds: u32) {
        if self.active {
            self.time_left += seconds;
            self.total_time += seconds;
        }
    }
}

/// Session engine errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A session cannot start on a workout with no exercises
    #[error("Workout has no exercises")]
    EmptyWorkout,

    /// Mutation attempted after the session finished
    #[error("Session is already finished")]
    SessionFinished,

    /// Exercise index outside the session's plan
    #[error("No exercise at index {0}")]
    InvalidExercise(usize),

    /// Set index outside an exercise's planned sets
    #[error("No set {set} for exercise {exercise}")]
    InvalidSet { exercise: usize, set: usize },

    /// Exercise lookup failed
    #[error("Exercise lookup failed: {0}")]
    Library(#[from] LibraryError),
}
