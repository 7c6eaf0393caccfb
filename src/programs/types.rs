//! Periodization program types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Days per schedule week. Every authored week is normalized to this
/// length; the resolver indexes into it directly.
pub const DAYS_PER_WEEK: usize = 7;

/// One week of a program schedule: seven workout-or-rest slots.
///
/// Slot 0 is Day 1 of that program week, relative to the client's
/// enrollment start date, not a calendar Monday.
pub type WeekSchedule = Vec<Option<Uuid>>;

/// A multi-week periodization template.
///
/// The schedule maps 1-based week numbers to seven slots each. Weeks
/// absent from the map are all-rest (program not authored that far, or
/// already over). Workouts are referenced by id, never embedded, so a
/// schedule edit can swap workouts without copying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Unique identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Planned length in weeks
    pub duration_weeks: u32,
    /// Free-form tags ("hypertrophy", "beginner", ...)
    pub tags: Vec<String>,
    /// Week number (1-based) -> seven workout-or-rest slots
    pub schedule: BTreeMap<u32, WeekSchedule>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Program {
    /// Create a new program with an empty (all-rest) schedule.
    pub fn new(title: impl Into<String>, duration_weeks: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            duration_weeks,
            tags: Vec::new(),
            schedule: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Author one week of the schedule. The slots are normalized to
    /// exactly seven entries (padded with rest, or truncated).
    pub fn set_week(&mut self, week: u32, slots: WeekSchedule) {
        self.schedule.insert(week, normalize_week(slots));
    }

    /// Normalize every authored week to seven slots. Applied at the
    /// write boundary so the resolver never sees a malformed week.
    pub fn normalize_schedule(&mut self) {
        for slots in self.schedule.values_mut() {
            let normalized = normalize_week(std::mem::take(slots));
            *slots = normalized;
        }
    }

    /// Whether any slot of any week references the given workout.
    pub fn references_workout(&self, workout_id: Uuid) -> bool {
        self.schedule
            .values()
            .flatten()
            .any(|slot| *slot == Some(workout_id))
    }
}

/// Pad or truncate a week to exactly seven slots.
pub fn normalize_week(mut slots: WeekSchedule) -> WeekSchedule {
    slots.truncate(DAYS_PER_WEEK);
    while slots.len() < DAYS_PER_WEEK {
        slots.push(None);
    }
    slots
}

/// Errors related to program operations.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// Program not found
    #[error("Program not found: {0}")]
    NotFound(Uuid),

    /// Program is assigned and cannot be deleted
    #[error("Program is assigned to client '{0}' and cannot be deleted")]
    InUse(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
