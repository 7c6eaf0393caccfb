//! Workout template types and errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Difficulty rating for exercises and workouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One line item inside a workout: an exercise with its set/rep scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    /// Referenced exercise definition
    pub exercise_id: Uuid,
    /// Number of sets (at least 1)
    pub sets: u32,
    /// Target reps, free-form ("10", "8-12", "AMRAP", "30s")
    pub reps: String,
    /// Rest between sets in seconds
    pub rest_seconds: u32,
    /// Optional coaching notes
    pub notes: Option<String>,
    /// Superset grouping key; entries sharing a key must be contiguous
    pub superset_id: Option<String>,
}

impl WorkoutExercise {
    /// Create a plain (non-superset) line item.
    pub fn new(exercise_id: Uuid, sets: u32, reps: impl Into<String>, rest_seconds: u32) -> Self {
        Self {
            exercise_id,
            sets,
            reps: reps.into(),
            rest_seconds,
            notes: None,
            superset_id: None,
        }
    }

    /// Attach this line item to a superset group.
    pub fn with_superset(mut self, superset_id: impl Into<String>) -> Self {
        self.superset_id = Some(superset_id.into());
        self
    }
}

/// A reusable named workout template.
///
/// Programs reference workouts by id and never embed them; clients receive
/// snapshots (`ClientWorkout`) so later template edits do not rewrite
/// already-assigned sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Description shown in the builder and player
    pub description: String,
    /// Free-form category ("Strength", "HIIT", "Mobility", ...)
    pub workout_type: String,
    /// Ordered exercise list; order defines execution order
    pub exercises: Vec<WorkoutExercise>,
    /// Estimated total duration in minutes
    pub duration_minutes: u32,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// Optional cover image URL
    pub cover_image_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Workout {
    /// Create a new workout template. The duration estimate is computed
    /// from the exercise list.
    pub fn new(title: String, workout_type: String, exercises: Vec<WorkoutExercise>) -> Self {
        let duration_minutes =
            crate::workouts::duration::estimate_duration_minutes(&exercises, &workout_type);

        Self {
            id: Uuid::new_v4(),
            title,
            description: String::new(),
            workout_type,
            exercises,
            duration_minutes,
            difficulty: Difficulty::default(),
            cover_image_url: None,
            created_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the difficulty rating.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Recompute the duration estimate after the exercise list changed.
    pub fn refresh_duration(&mut self) {
        self.duration_minutes = crate::workouts::duration::estimate_duration_minutes(
            &self.exercises,
            &self.workout_type,
        );
    }
}

/// Errors related to workout operations.
#[derive(Debug, Error)]
pub enum WorkoutError {
    /// Workout not found
    #[error("Workout not found: {0}")]
    NotFound(Uuid),

    /// Workout has no exercises
    #[error("Workout has no exercises")]
    EmptyWorkout,

    /// Superset entries sharing a group key are not adjacent
    #[error("Superset group '{0}' is not contiguous")]
    NonContiguousSuperset(String),

    /// Exercise line item with zero sets
    #[error("Exercise at position {0} has zero sets")]
    ZeroSets(usize),

    /// Workout is referenced and cannot be deleted
    #[error("Workout is in use by {0} and cannot be deleted")]
    InUse(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
