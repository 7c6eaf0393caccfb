//! Workout template persistence.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::sequencer::validate_superset_contiguity;
use super::types::{Difficulty, Workout, WorkoutError};

/// Store for workout templates.
pub struct WorkoutStore<'a> {
    conn: &'a Connection,
}

impl<'a> WorkoutStore<'a> {
    /// Create a new workout store.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a workout template.
    ///
    /// The write boundary enforces what the sequencer assumes: at least
    /// one exercise, no zero-set line items, contiguous superset groups.
    pub fn insert(&self, workout: &Workout) -> Result<(), WorkoutError> {
        validate_workout(workout)?;

        self.conn.execute(
            "INSERT INTO workouts
             (id, title, description, workout_type, exercises_json, duration_minutes,
              difficulty, cover_image_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                workout.id.to_string(),
                workout.title,
                workout.description,
                workout.workout_type,
                serde_json::to_string(&workout.exercises)?,
                workout.duration_minutes,
                format!("{:?}", workout.difficulty),
                workout.cover_image_url,
                workout.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a workout by id.
    pub fn get(&self, id: Uuid) -> Result<Option<Workout>, WorkoutError> {
        self.conn
            .query_row(
                "SELECT id, title, description, workout_type, exercises_json, duration_minutes,
                        difficulty, cover_image_url, created_at
                 FROM workouts WHERE id = ?1",
                params![id.to_string()],
                parse_workout_row,
            )
            .optional()
            .map_err(WorkoutError::from)
    }

    /// Get all workout templates.
    pub fn get_all(&self) -> Result<Vec<Workout>, WorkoutError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, workout_type, exercises_json, duration_minutes,
                    difficulty, cover_image_url, created_at
             FROM workouts ORDER BY title",
        )?;

        let rows = stmt.query_map([], parse_workout_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(WorkoutError::from)
    }

    /// Update a workout template. The stored duration estimate is
    /// refreshed from the exercise list.
    pub fn update(&self, workout: &Workout) -> Result<(), WorkoutError> {
        validate_workout(workout)?;

        let mut workout = workout.clone();
        workout.refresh_duration();

        let updated = self.conn.execute(
            "UPDATE workouts SET
             title = ?1, description = ?2, workout_type = ?3, exercises_json = ?4,
             duration_minutes = ?5, difficulty = ?6, cover_image_url = ?7
             WHERE id = ?8",
            params![
                workout.title,
                workout.description,
                workout.workout_type,
                serde_json::to_string(&workout.exercises)?,
                workout.duration_minutes,
                format!("{:?}", workout.difficulty),
                workout.cover_image_url,
                workout.id.to_string(),
            ],
        )?;

        if updated == 0 {
            return Err(WorkoutError::NotFound(workout.id));
        }
        Ok(())
    }

    /// Delete a workout template.
    ///
    /// Rejected while any program schedule slot or client assignment
    /// still references it; the error names the blocker. Client workout
    /// snapshots carry the template id as provenance only, but deleting
    /// the template out from under them would still orphan that link.
    pub fn delete(&self, id: Uuid) -> Result<(), WorkoutError> {
        let id_str = id.to_string();

        let program: Option<String> = self
            .conn
            .query_row(
                "SELECT title FROM programs WHERE schedule_json LIKE ?1 LIMIT 1",
                params![format!("%{}%", id_str)],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(title) = program {
            return Err(WorkoutError::InUse(format!("program '{}'", title)));
        }

        let client: Option<String> = self
            .conn
            .query_row(
                "SELECT c.name FROM client_workouts cw
                 JOIN clients c ON c.id = cw.client_id
                 WHERE cw.workout_id = ?1 LIMIT 1",
                params![id_str],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(name) = client {
            return Err(WorkoutError::InUse(format!("client '{}'", name)));
        }

        let deleted = self
            .conn
            .execute("DELETE FROM workouts WHERE id = ?1", params![id_str])?;

        if deleted == 0 {
            return Err(WorkoutError::NotFound(id));
        }

        tracing::debug!("Deleted workout {}", id);
        Ok(())
    }
}

/// Shape checks applied on every write.
fn validate_workout(workout: &Workout) -> Result<(), WorkoutError> {
    if workout.exercises.is_empty() {
        return Err(WorkoutError::EmptyWorkout);
    }

    if let Some(pos) = workout.exercises.iter().position(|e| e.sets == 0) {
        return Err(WorkoutError::ZeroSets(pos));
    }

    validate_superset_contiguity(&workout.exercises)
}

fn parse_workout_row(row: &rusqlite::Row) -> rusqlite::Result<Workout> {
    let id_str: String = row.get(0)?;
    let exercises_json: String = row.get(4)?;
    let difficulty_str: String = row.get(6)?;
    let created_at_str: String = row.get(8)?;

    let difficulty = match difficulty_str.as_str() {
        "Beginner" => Difficulty::Beginner,
        "Advanced" => Difficulty::Advanced,
        _ => Difficulty::Intermediate,
    };

    Ok(Workout {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        title: row.get(1)?,
        description: row.get(2)?,
        workout_type: row.get(3)?,
        exercises: serde_json::from_str(&exercises_json).unwrap_or_default(),
        duration_minutes: row.get(5)?,
        difficulty,
        cover_image_url: row.get(7)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
