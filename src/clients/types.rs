//! Client roster types.
//!
//! Client-side assignments are snapshots: a `ClientWorkout` carries its
//! own copy of the exercise list, so trainer edits to the source
//! template never retroactively change what a client already has
//! scheduled. The template id is kept for provenance only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::workouts::types::{Workout, WorkoutExercise};

/// An individual coached client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Training goal, free text
    pub goal: String,
    /// Active program enrollment (at most one)
    pub assigned_program_id: Option<Uuid>,
    /// Enrollment start date; week/day math is relative to this
    pub program_start_date: Option<NaiveDate>,
    /// Date-pinned workout snapshots
    pub assigned_workouts: Vec<ClientWorkout>,
    /// Date-pinned single exercise assignments
    pub assigned_exercises: Vec<ClientExercise>,
    /// Body measurement history, ordered by date
    pub measurements: Vec<Measurement>,
    /// Completed session history
    pub workout_logs: Vec<WorkoutLog>,
    /// Last session activity
    pub last_active: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Create a new client.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            goal: String::new(),
            assigned_program_id: None,
            program_start_date: None,
            assigned_workouts: Vec::new(),
            assigned_exercises: Vec::new(),
            measurements: Vec::new(),
            workout_logs: Vec::new(),
            last_active: None,
            created_at: Utc::now(),
        }
    }

    /// Set the training goal.
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }
}

/// A per-client snapshot of a workout, pinned to a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientWorkout {
    /// Own identifier, distinct from the source template's
    pub id: Uuid,
    /// Source template id, provenance only
    pub workout_id: Option<Uuid>,
    /// Possibly customized title
    pub title: String,
    /// Category carried over from the template
    pub workout_type: String,
    /// Date this session is scheduled for
    pub assigned_date: NaiveDate,
    /// Whether the client completed it
    pub completed: bool,
    /// Trainer notes for this assignment
    pub notes: Option<String>,
    /// Independent copy of the exercise list
    pub exercises: Vec<WorkoutExercise>,
}

impl ClientWorkout {
    /// Snapshot a workout template for one client and date.
    pub fn from_template(workout: &Workout, assigned_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout_id: Some(workout.id),
            title: workout.title.clone(),
            workout_type: workout.workout_type.clone(),
            assigned_date,
            completed: false,
            notes: None,
            exercises: workout.exercises.clone(),
        }
    }
}

/// A single ad-hoc exercise pinned to one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientExercise {
    /// Own identifier
    pub id: Uuid,
    /// Referenced exercise definition
    pub exercise_id: Uuid,
    /// Date assigned
    pub assigned_date: NaiveDate,
    /// Number of sets
    pub sets: u32,
    /// Target reps, free-form
    pub reps: String,
    /// Trainer notes
    pub notes: Option<String>,
    /// Whether the client completed it
    pub completed: bool,
}

impl ClientExercise {
    /// Create a new ad-hoc exercise assignment.
    pub fn new(exercise_id: Uuid, assigned_date: NaiveDate, sets: u32, reps: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id,
            assigned_date,
            sets,
            reps: reps.into(),
            notes: None,
            completed: false,
        }
    }
}

/// A body measurement entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weight_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub notes: Option<String>,
}

/// One logged set. Weight and reps stay as the strings the user typed;
/// numeric coercion happens only where a computation needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLog {
    pub weight: String,
    pub reps: String,
    pub completed: bool,
}

/// All logged sets for one exercise of a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedExercise {
    /// The exercise actually performed (substitutions included)
    pub exercise_id: Uuid,
    /// Exercise name at time of logging, kept so history survives
    /// library edits and deletions
    pub exercise_name: String,
    /// Per-set logs, in set order
    pub sets: Vec<SetLog>,
}

/// A completed session, flushed from session state on finish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    /// Calendar date the session was performed
    pub date: NaiveDate,
    /// Source workout template, when the session came from one
    pub workout_id: Option<Uuid>,
    /// Workout title at time of logging
    pub title: String,
    /// Per-exercise logs in execution order
    pub entries: Vec<LoggedExercise>,
}

/// Errors related to client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client not found
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// Referenced program does not exist
    #[error("Program not found: {0}")]
    ProgramNotFound(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
