//! Client roster persistence.
//!
//! Loading a client assembles the child tables (assignments,
//! measurements, logs) into one aggregate. `apply_session_log` is the
//! persistence handoff the session engine calls once per finished
//! session: append the log, bump last-active.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::types::{
    Client, ClientError, ClientExercise, ClientWorkout, Measurement, WorkoutLog,
};

/// Store for clients and their assignments.
pub struct ClientStore<'a> {
    conn: &'a Connection,
}

impl<'a> ClientStore<'a> {
    /// Create a new client store.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a client and all of its child records.
    pub fn insert(&self, client: &Client) -> Result<(), ClientError> {
        self.conn.execute(
            "INSERT INTO clients
             (id, name, email, goal, assigned_program_id, program_start_date, last_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                client.id.to_string(),
                client.name,
                client.email,
                client.goal,
                client.assigned_program_id.map(|id| id.to_string()),
                client.program_start_date.map(|d| d.to_string()),
                client.last_active.map(|t| t.to_rfc3339()),
                client.created_at.to_rfc3339(),
            ],
        )?;

        for workout in &client.assigned_workouts {
            self.insert_assigned_workout(client.id, workout)?;
        }
        for exercise in &client.assigned_exercises {
            self.insert_assigned_exercise(client.id, exercise)?;
        }
        for measurement in &client.measurements {
            self.insert_measurement(client.id, measurement)?;
        }
        for log in &client.workout_logs {
            self.insert_workout_log(client.id, log)?;
        }

        Ok(())
    }

    /// Get a client by id, with all child records assembled.
    pub fn get(&self, id: Uuid) -> Result<Option<Client>, ClientError> {
        let base = self
            .conn
            .query_row(
                "SELECT id, name, email, goal, assigned_program_id, program_start_date,
                        last_active, created_at
                 FROM clients WHERE id = ?1",
                params![id.to_string()],
                parse_client_row,
            )
            .optional()?;

        let Some(mut client) = base else {
            return Ok(None);
        };

        client.assigned_workouts = self.load_assigned_workouts(id)?;
        client.assigned_exercises = self.load_assigned_exercises(id)?;
        client.measurements = self.load_measurements(id)?;
        client.workout_logs = self.load_workout_logs(id)?;

        Ok(Some(client))
    }

    /// Get all clients (child records included).
    pub fn get_all(&self) -> Result<Vec<Client>, ClientError> {
        let ids: Vec<Uuid> = {
            let mut stmt = self
                .conn
                .prepare("SELECT id FROM clients ORDER BY name")?;
            let rows = stmt.query_map([], |row| {
                let id: String = row.get(0)?;
                Ok(Uuid::parse_str(&id).unwrap_or_default())
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let mut clients = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(client) = self.get(id)? {
                clients.push(client);
            }
        }
        Ok(clients)
    }

    /// Update a client's base fields (identity, goal, enrollment).
    pub fn update(&self, client: &Client) -> Result<(), ClientError> {
        let updated = self.conn.execute(
            "UPDATE clients SET
             name = ?1, email = ?2, goal = ?3, assigned_program_id = ?4,
             program_start_date = ?5, last_active = ?6
             WHERE id = ?7",
            params![
                client.name,
                client.email,
                client.goal,
                client.assigned_program_id.map(|id| id.to_string()),
                client.program_start_date.map(|d| d.to_string()),
                client.last_active.map(|t| t.to_rfc3339()),
                client.id.to_string(),
            ],
        )?;

        if updated == 0 {
            return Err(ClientError::NotFound(client.id));
        }
        Ok(())
    }

    /// Delete a client and all child records.
    pub fn delete(&self, id: Uuid) -> Result<bool, ClientError> {
        // Child tables cascade
        let deleted = self.conn.execute(
            "DELETE FROM clients WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Enroll a client in a program starting on the given date.
    pub fn assign_program(
        &self,
        client_id: Uuid,
        program_id: Uuid,
        start_date: NaiveDate,
    ) -> Result<(), ClientError> {
        let exists: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM programs WHERE id = ?1",
                params![program_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        if exists.is_none() {
            return Err(ClientError::ProgramNotFound(program_id));
        }

        let updated = self.conn.execute(
            "UPDATE clients SET assigned_program_id = ?1, program_start_date = ?2 WHERE id = ?3",
            params![
                program_id.to_string(),
                start_date.to_string(),
                client_id.to_string()
            ],
        )?;

        if updated == 0 {
            return Err(ClientError::NotFound(client_id));
        }

        tracing::info!("Assigned program {} to client {}", program_id, client_id);
        Ok(())
    }

    /// Drop a client's program enrollment.
    pub fn unassign_program(&self, client_id: Uuid) -> Result<(), ClientError> {
        let updated = self.conn.execute(
            "UPDATE clients SET assigned_program_id = NULL, program_start_date = NULL WHERE id = ?1",
            params![client_id.to_string()],
        )?;

        if updated == 0 {
            return Err(ClientError::NotFound(client_id));
        }
        Ok(())
    }

    /// Pin a workout snapshot to a client's calendar.
    pub fn assign_workout(&self, client_id: Uuid, workout: &ClientWorkout) -> Result<(), ClientError> {
        self.insert_assigned_workout(client_id, workout)
    }

    /// Pin a single ad-hoc exercise to a client's calendar.
    pub fn assign_exercise(
        &self,
        client_id: Uuid,
        exercise: &ClientExercise,
    ) -> Result<(), ClientError> {
        self.insert_assigned_exercise(client_id, exercise)
    }

    /// Record a body measurement.
    pub fn add_measurement(
        &self,
        client_id: Uuid,
        measurement: &Measurement,
    ) -> Result<(), ClientError> {
        self.insert_measurement(client_id, measurement)
    }

    /// Persist a finished session: append its log and bump last-active.
    ///
    /// Called exactly once per completed session. Best effort from the
    /// session's perspective; on failure the engine keeps the log so the
    /// handoff can be retried.
    pub fn apply_session_log(&self, client_id: Uuid, log: &WorkoutLog) -> Result<(), ClientError> {
        self.insert_workout_log(client_id, log)?;

        self.conn.execute(
            "UPDATE clients SET last_active = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), client_id.to_string()],
        )?;

        tracing::info!("Recorded session log for client {}", client_id);
        Ok(())
    }

    fn insert_assigned_workout(
        &self,
        client_id: Uuid,
        workout: &ClientWorkout,
    ) -> Result<(), ClientError> {
        self.conn.execute(
            "INSERT INTO client_workouts
             (id, client_id, workout_id, title, workout_type, assigned_date, completed, notes, exercises_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                workout.id.to_string(),
                client_id.to_string(),
                workout.workout_id.map(|id| id.to_string()),
                workout.title,
                workout.workout_type,
                workout.assigned_date.to_string(),
                workout.completed,
                workout.notes,
                serde_json::to_string(&workout.exercises)?,
            ],
        )?;
        Ok(())
    }

    fn insert_assigned_exercise(
        &self,
        client_id: Uuid,
        exercise: &ClientExercise,
    ) -> Result<(), ClientError> {
        self.conn.execute(
            "INSERT INTO client_exercises
             (id, client_id, exercise_id, assigned_date, sets, reps, notes, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                exercise.id.to_string(),
                client_id.to_string(),
                exercise.exercise_id.to_string(),
                exercise.assigned_date.to_string(),
                exercise.sets,
                exercise.reps,
                exercise.notes,
                exercise.completed,
            ],
        )?;
        Ok(())
    }

    fn insert_measurement(
        &self,
        client_id: Uuid,
        measurement: &Measurement,
    ) -> Result<(), ClientError> {
        self.conn.execute(
            "INSERT INTO measurements (id, client_id, date, weight_kg, body_fat_pct, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                measurement.id.to_string(),
                client_id.to_string(),
                measurement.date.to_string(),
                measurement.weight_kg,
                measurement.body_fat_pct,
                measurement.notes,
            ],
        )?;
        Ok(())
    }

    fn insert_workout_log(&self, client_id: Uuid, log: &WorkoutLog) -> Result<(), ClientError> {
        self.conn.execute(
            "INSERT INTO workout_logs (id, client_id, date, workout_id, title, entries_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                log.id.to_string(),
                client_id.to_string(),
                log.date.to_string(),
                log.workout_id.map(|id| id.to_string()),
                log.title,
                serde_json::to_string(&log.entries)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn load_assigned_workouts(&self, client_id: Uuid) -> Result<Vec<ClientWorkout>, ClientError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workout_id, title, workout_type, assigned_date, completed, notes, exercises_json
             FROM client_workouts WHERE client_id = ?1 ORDER BY assigned_date",
        )?;

        let rows = stmt.query_map(params![client_id.to_string()], |row| {
            let id_str: String = row.get(0)?;
            let workout_id: Option<String> = row.get(1)?;
            let date_str: String = row.get(4)?;
            let exercises_json: String = row.get(7)?;

            Ok(ClientWorkout {
                id: Uuid::parse_str(&id_str).unwrap_or_default(),
                workout_id: workout_id.and_then(|s| Uuid::parse_str(&s).ok()),
                title: row.get(2)?,
                workout_type: row.get(3)?,
                assigned_date: date_str.parse().unwrap_or_default(),
                completed: row.get(5)?,
                notes: row.get(6)?,
                exercises: serde_json::from_str(&exercises_json).unwrap_or_default(),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(ClientError::from)
    }

    fn load_assigned_exercises(&self, client_id: Uuid) -> Result<Vec<ClientExercise>, ClientError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, exercise_id, assigned_date, sets, reps, notes, completed
             FROM client_exercises WHERE client_id = ?1 ORDER BY assigned_date",
        )?;

        let rows = stmt.query_map(params![client_id.to_string()], |row| {
            let id_str: String = row.get(0)?;
            let exercise_id_str: String = row.get(1)?;
            let date_str: String = row.get(2)?;

            Ok(ClientExercise {
                id: Uuid::parse_str(&id_str).unwrap_or_default(),
                exercise_id: Uuid::parse_str(&exercise_id_str).unwrap_or_default(),
                assigned_date: date_str.parse().unwrap_or_default(),
                sets: row.get(3)?,
                reps: row.get(4)?,
                notes: row.get(5)?,
                completed: row.get(6)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(ClientError::from)
    }

    fn load_measurements(&self, client_id: Uuid) -> Result<Vec<Measurement>, ClientError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, weight_kg, body_fat_pct, notes
             FROM measurements WHERE client_id = ?1 ORDER BY date",
        )?;

        let rows = stmt.query_map(params![client_id.to_string()], |row| {
            let id_str: String = row.get(0)?;
            let date_str: String = row.get(1)?;

            Ok(Measurement {
                id: Uuid::parse_str(&id_str).unwrap_or_default(),
                date: date_str.parse().unwrap_or_default(),
                weight_kg: row.get(2)?,
                body_fat_pct: row.get(3)?,
                notes: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(ClientError::from)
    }

    fn load_workout_logs(&self, client_id: Uuid) -> Result<Vec<WorkoutLog>, ClientError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, workout_id, title, entries_json
             FROM workout_logs WHERE client_id = ?1 ORDER BY date",
        )?;

        let rows = stmt.query_map(params![client_id.to_string()], |row| {
            let id_str: String = row.get(0)?;
            let date_str: String = row.get(1)?;
            let workout_id: Option<String> = row.get(2)?;
            let entries_json: String = row.get(4)?;

            Ok(WorkoutLog {
                id: Uuid::parse_str(&id_str).unwrap_or_default(),
                date: date_str.parse().unwrap_or_default(),
                workout_id: workout_id.and_then(|s| Uuid::parse_str(&s).ok()),
                title: row.get(3)?,
                entries: serde_json::from_str(&entries_json).unwrap_or_default(),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(ClientError::from)
    }
}

fn parse_client_row(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    let id_str: String = row.get(0)?;
    let program_id: Option<String> = row.get(4)?;
    let start_date: Option<String> = row.get(5)?;
    let last_active: Option<String> = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Client {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        name: row.get(1)?,
        email: row.get(2)?,
        goal: row.get(3)?,
        assigned_program_id: program_id.and_then(|s| Uuid::parse_str(&s).ok()),
        program_start_date: start_date.and_then(|s| s.parse().ok()),
        assigned_workouts: Vec::new(),
        assigned_exercises: Vec::new(),
        measurements: Vec::new(),
        workout_logs: Vec::new(),
        last_active: last_active
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|t| t.with_timezone(&Utc)),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
