//! Exercise library store.
//!
//! CRUD and search over exercise definitions, plus a starter seed so a
//! fresh install has something to build workouts from.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

use super::matching;
use super::types::{Difficulty, Exercise, MuscleGroup};

/// Exercise library backed by the application database.
pub struct ExerciseLibrary<'a> {
    conn: &'a Connection,
}

impl<'a> ExerciseLibrary<'a> {
    /// Create a new library over a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Seed the library with starter exercises if it is empty.
    pub fn seed_if_empty(&self) -> Result<usize, LibraryError> {
        let count: i32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?;

        if count > 0 {
            return Ok(0);
        }

        let exercises = generate_seed_exercises();
        for exercise in &exercises {
            self.insert(exercise)?;
        }

        tracing::info!("Seeded exercise library with {} exercises", exercises.len());
        Ok(exercises.len())
    }

    /// Insert an exercise.
    pub fn insert(&self, exercise: &Exercise) -> Result<(), LibraryError> {
        self.conn.execute(
            "INSERT INTO exercises
             (id, name, muscle_group, difficulty, description, equipment_json, media_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                exercise.id.to_string(),
                exercise.name,
                format!("{:?}", exercise.muscle_group),
                format!("{:?}", exercise.difficulty),
                exercise.description,
                serde_json::to_string(&exercise.equipment)?,
                exercise.media_url,
                exercise.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get an exercise by id.
    pub fn get(&self, id: Uuid) -> Result<Option<Exercise>, LibraryError> {
        self.conn
            .query_row(
                "SELECT id, name, muscle_group, difficulty, description, equipment_json, media_url, created_at
                 FROM exercises WHERE id = ?1",
                params![id.to_string()],
                parse_exercise_row,
            )
            .optional()
            .map_err(LibraryError::from)
    }

    /// Get all exercises, ordered by muscle group then name.
    pub fn get_all(&self) -> Result<Vec<Exercise>, LibraryError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, muscle_group, difficulty, description, equipment_json, media_url, created_at
             FROM exercises ORDER BY muscle_group, name",
        )?;

        let rows = stmt.query_map([], parse_exercise_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(LibraryError::from)
    }

    /// Search exercises by criteria.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Exercise>, LibraryError> {
        let mut exercises = self.get_all()?;

        if let Some(group) = criteria.muscle_group {
            exercises.retain(|e| e.muscle_group == group);
        }

        if let Some(difficulty) = criteria.difficulty {
            exercises.retain(|e| e.difficulty == difficulty);
        }

        if let Some(name) = &criteria.name_contains {
            let needle = matching::normalize_name(name);
            exercises.retain(|e| matching::normalize_name(&e.name).contains(&needle));
        }

        if let Some(tag) = &criteria.equipment {
            exercises.retain(|e| e.equipment.iter().any(|t| t.eq_ignore_ascii_case(tag)));
        }

        Ok(exercises)
    }

    /// Find an exercise by fuzzy name match, for de-duplication.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Exercise>, LibraryError> {
        let all = self.get_all()?;
        Ok(matching::find_match(name, &all).cloned())
    }

    /// Update an exercise definition.
    pub fn update(&self, exercise: &Exercise) -> Result<(), LibraryError> {
        let updated = self.conn.execute(
            "UPDATE exercises SET
             name = ?1, muscle_group = ?2, difficulty = ?3, description = ?4,
             equipment_json = ?5, media_url = ?6
             WHERE id = ?7",
            params![
                exercise.name,
                format!("{:?}", exercise.muscle_group),
                format!("{:?}", exercise.difficulty),
                exercise.description,
                serde_json::to_string(&exercise.equipment)?,
                exercise.media_url,
                exercise.id.to_string(),
            ],
        )?;

        if updated == 0 {
            return Err(LibraryError::NotFound(exercise.id));
        }
        Ok(())
    }

    /// Delete an exercise. Workouts that still reference it show a
    /// placeholder rather than blocking deletion.
    pub fn delete(&self, id: Uuid) -> Result<bool, LibraryError> {
        let deleted = self.conn.execute(
            "DELETE FROM exercises WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Get exercise count.
    pub fn count(&self) -> Result<usize, LibraryError> {
        let count: i32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Search criteria for exercises.
#[derive(Debug, Default)]
pub struct SearchCriteria {
    pub muscle_group: Option<MuscleGroup>,
    pub difficulty: Option<Difficulty>,
    pub name_contains: Option<String>,
    pub equipment: Option<String>,
}

fn parse_exercise_row(row: &rusqlite::Row) -> rusqlite::Result<Exercise> {
    let id_str: String = row.get(0)?;
    let group_str: String = row.get(2)?;
    let difficulty_str: String = row.get(3)?;
    let equipment_json: String = row.get(5)?;
    let created_at_str: String = row.get(7)?;

    let muscle_group = match group_str.as_str() {
        "Chest" => MuscleGroup::Chest,
        "Back" => MuscleGroup::Back,
        "Legs" => MuscleGroup::Legs,
        "Shoulders" => MuscleGroup::Shoulders,
        "Arms" => MuscleGroup::Arms,
        "Core" => MuscleGroup::Core,
        "Cardio" => MuscleGroup::Cardio,
        _ => MuscleGroup::FullBody,
    };

    let difficulty = match difficulty_str.as_str() {
        "Beginner" => Difficulty::Beginner,
        "Advanced" => Difficulty::Advanced,
        _ => Difficulty::Intermediate,
    };

    Ok(Exercise {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        name: row.get(1)?,
        muscle_group,
        difficulty,
        description: row.get(4)?,
        equipment: serde_json::from_str(&equipment_json).unwrap_or_default(),
        media_url: row.get(6)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Generate the starter exercise set.
fn generate_seed_exercises() -> Vec<Exercise> {
    vec![
        Exercise::new("Barbell Bench Press", MuscleGroup::Chest, Difficulty::Intermediate)
            .with_description("Flat barbell press, full range of motion.")
            .with_equipment(vec!["barbell".into(), "bench".into()]),
        Exercise::new("Push-Up", MuscleGroup::Chest, Difficulty::Beginner)
            .with_description("Bodyweight press, rigid plank position.")
            .with_equipment(vec!["bodyweight".into()]),
        Exercise::new("Pull-Up", MuscleGroup::Back, Difficulty::Intermediate)
            .with_description("Overhand grip, chin over bar.")
            .with_equipment(vec!["pull-up bar".into()]),
        Exercise::new("Bent-Over Row", MuscleGroup::Back, Difficulty::Intermediate)
            .with_description("Barbell row, flat back, pull to waist.")
            .with_equipment(vec!["barbell".into()]),
        Exercise::new("Back Squat", MuscleGroup::Legs, Difficulty::Intermediate)
            .with_description("High-bar squat to parallel or below.")
            .with_equipment(vec!["barbell".into(), "rack".into()]),
        Exercise::new("Romanian Deadlift", MuscleGroup::Legs, Difficulty::Intermediate)
            .with_description("Hip hinge, soft knees, bar close to legs.")
            .with_equipment(vec!["barbell".into()]),
        Exercise::new("Walking Lunge", MuscleGroup::Legs, Difficulty::Beginner)
            .with_description("Alternating lunges, torso upright.")
            .with_equipment(vec!["bodyweight".into(), "dumbbells".into()]),
        Exercise::new("Overhead Press", MuscleGroup::Shoulders, Difficulty::Intermediate)
            .with_description("Standing barbell press, braced core.")
            .with_equipment(vec!["barbell".into()]),
        Exercise::new("Lateral Raise", MuscleGroup::Shoulders, Difficulty::Beginner)
            .with_description("Dumbbell raise to shoulder height.")
            .with_equipment(vec!["dumbbells".into()]),
        Exercise::new("Biceps Curl", MuscleGroup::Arms, Difficulty::Beginner)
            .with_description("Dumbbell curl, elbows pinned.")
            .with_equipment(vec!["dumbbells".into()]),
        Exercise::new("Triceps Dip", MuscleGroup::Arms, Difficulty::Intermediate)
            .with_description("Parallel bar dip, elbows tracking back.")
            .with_equipment(vec!["dip bars".into()]),
        Exercise::new("Plank", MuscleGroup::Core, Difficulty::Beginner)
            .with_description("Forearm plank, neutral spine.")
            .with_equipment(vec!["bodyweight".into()]),
        Exercise::new("Hanging Leg Raise", MuscleGroup::Core, Difficulty::Advanced)
            .with_description("Controlled raise, no swing.")
            .with_equipment(vec!["pull-up bar".into()]),
        Exercise::new("Rowing Machine", MuscleGroup::Cardio, Difficulty::Beginner)
            .with_description("Steady-state erg intervals.")
            .with_equipment(vec!["rower".into()]),
        Exercise::new("Burpee", MuscleGroup::FullBody, Difficulty::Intermediate)
            .with_description("Squat thrust to jump, continuous pace.")
            .with_equipment(vec!["bodyweight".into()]),
        Exercise::new("Kettlebell Swing", MuscleGroup::FullBody, Difficulty::Intermediate)
            .with_description("Hip-drive swing to chest height.")
            .with_equipment(vec!["kettlebell".into()]),
    ]
}

/// Library errors.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Exercise not found: {0}")]
    NotFound(Uuid),
}
