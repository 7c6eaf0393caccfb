//! Program persistence.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::types::{Program, ProgramError};

/// Store for periodization programs.
pub struct ProgramStore<'a> {
    conn: &'a Connection,
}

impl<'a> ProgramStore<'a> {
    /// Create a new program store.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a program. The schedule is normalized to seven-slot weeks
    /// before writing.
    pub fn insert(&self, program: &Program) -> Result<(), ProgramError> {
        let mut program = program.clone();
        program.normalize_schedule();

        self.conn.execute(
            "INSERT INTO programs (id, title, duration_weeks, tags_json, schedule_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                program.id.to_string(),
                program.title,
                program.duration_weeks,
                serde_json::to_string(&program.tags)?,
                serde_json::to_string(&program.schedule)?,
                program.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a program by id.
    pub fn get(&self, id: Uuid) -> Result<Option<Program>, ProgramError> {
        self.conn
            .query_row(
                "SELECT id, title, duration_weeks, tags_json, schedule_json, created_at
                 FROM programs WHERE id = ?1",
                params![id.to_string()],
                parse_program_row,
            )
            .optional()
            .map_err(ProgramError::from)
    }

    /// Get all programs.
    pub fn get_all(&self) -> Result<Vec<Program>, ProgramError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, duration_weeks, tags_json, schedule_json, created_at
             FROM programs ORDER BY title",
        )?;

        let rows = stmt.query_map([], parse_program_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(ProgramError::from)
    }

    /// Update a program, normalizing the schedule.
    pub fn update(&self, program: &Program) -> Result<(), ProgramError> {
        let mut program = program.clone();
        program.normalize_schedule();

        let updated = self.conn.execute(
            "UPDATE programs SET title = ?1, duration_weeks = ?2, tags_json = ?3, schedule_json = ?4
             WHERE id = ?5",
            params![
                program.title,
                program.duration_weeks,
                serde_json::to_string(&program.tags)?,
                serde_json::to_string(&program.schedule)?,
                program.id.to_string(),
            ],
        )?;

        if updated == 0 {
            return Err(ProgramError::NotFound(program.id));
        }
        Ok(())
    }

    /// Delete a program.
    ///
    /// Rejected while any client is enrolled in it; the error names the
    /// first blocking client so the trainer knows what to unassign.
    pub fn delete(&self, id: Uuid) -> Result<(), ProgramError> {
        let blocker: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM clients WHERE assigned_program_id = ?1 LIMIT 1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(client_name) = blocker {
            return Err(ProgramError::InUse(client_name));
        }

        let deleted = self.conn.execute(
            "DELETE FROM programs WHERE id = ?1",
            params![id.to_string()],
        )?;

        if deleted == 0 {
            return Err(ProgramError::NotFound(id));
        }

        tracing::debug!("Deleted program {}", id);
        Ok(())
    }
}

fn parse_program_row(row: &rusqlite::Row) -> rusqlite::Result<Program> {
    let id_str: String = row.get(0)?;
    let tags_json: String = row.get(3)?;
    let schedule_json: String = row.get(4)?;
    let created_at_str: String = row.get(5)?;

    Ok(Program {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        title: row.get(1)?,
        duration_weeks: row.get(2)?,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        schedule: serde_json::from_str(&schedule_json).unwrap_or_default(),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
