//! Exercise definition types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::workouts::types::Difficulty;

/// Primary muscle group targeted by an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
    FullBody,
}

impl MuscleGroup {
    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Core => "Core",
            MuscleGroup::Cardio => "Cardio",
            MuscleGroup::FullBody => "Full Body",
        }
    }

    /// Get all muscle groups.
    pub fn all() -> Vec<MuscleGroup> {
        vec![
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Legs,
            MuscleGroup::Shoulders,
            MuscleGroup::Arms,
            MuscleGroup::Core,
            MuscleGroup::Cardio,
            MuscleGroup::FullBody,
        ]
    }
}

impl std::fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// An exercise definition: immutable reference data looked up by id.
///
/// Created by manual entry, generation, or bulk import; never mutated
/// during playback (substitutions are session-local overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Primary muscle group
    pub muscle_group: MuscleGroup,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// How-to description
    pub description: String,
    /// Equipment tags ("barbell", "bodyweight", ...)
    pub equipment: Vec<String>,
    /// Optional demo media URL
    pub media_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Exercise {
    /// Create a new exercise definition.
    pub fn new(name: impl Into<String>, muscle_group: MuscleGroup, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            muscle_group,
            difficulty,
            description: String::new(),
            equipment: Vec::new(),
            media_url: None,
            created_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the equipment tags.
    pub fn with_equipment(mut self, equipment: Vec<String>) -> Self {
        self.equipment = equipment;
        self
    }
}
