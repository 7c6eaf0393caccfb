//! Database schema definitions for Repcoach.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Exercise library
CREATE TABLE IF NOT EXISTS exercises (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    muscle_group TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    equipment_json TEXT NOT NULL DEFAULT '[]',
    media_url TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exercises_muscle_group ON exercises(muscle_group);

-- Workout templates
CREATE TABLE IF NOT EXISTS workouts (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    workout_type TEXT NOT NULL,
    exercises_json TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL,
    difficulty TEXT NOT NULL,
    cover_image_url TEXT,
    created_at TEXT NOT NULL
);

-- Periodization programs (week -> 7 workout-or-rest slots, as JSON)
CREATE TABLE IF NOT EXISTS programs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    duration_weeks INTEGER NOT NULL,
    tags_json TEXT NOT NULL DEFAULT '[]',
    schedule_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Client roster
CREATE TABLE IF NOT EXISTS clients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT,
    goal TEXT NOT NULL DEFAULT '',
    assigned_program_id TEXT REFERENCES programs(id),
    program_start_date TEXT,
    last_active TEXT,
    created_at TEXT NOT NULL
);

-- Per-client workout snapshots pinned to dates
CREATE TABLE IF NOT EXISTS client_workouts (
    id TEXT PRIMARY KEY,
    client_id TEXT NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    workout_id TEXT,
    title TEXT NOT NULL,
    workout_type TEXT NOT NULL DEFAULT '',
    assigned_date TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    exercises_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_client_workouts_client_id ON client_workouts(client_id);
CREATE INDEX IF NOT EXISTS idx_client_workouts_date ON client_workouts(assigned_date);

-- Single ad-hoc exercise assignments pinned to dates
CREATE TABLE IF NOT EXISTS client_exercises (
    id TEXT PRIMARY KEY,
    client_id TEXT NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    exercise_id TEXT NOT NULL,
    assigned_date TEXT NOT NULL,
    sets INTEGER NOT NULL,
    reps TEXT NOT NULL,
    notes TEXT,
    completed INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_client_exercises_client_id ON client_exercises(client_id);

-- Completed session logs
CREATE TABLE IF NOT EXISTS workout_logs (
    id TEXT PRIMARY KEY,
    client_id TEXT NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    workout_id TEXT,
    title TEXT NOT NULL,
    entries_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_workout_logs_client_id ON workout_logs(client_id);

-- Body measurement history
CREATE TABLE IF NOT EXISTS measurements (
    id TEXT PRIMARY KEY,
    client_id TEXT NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    weight_kg REAL,
    body_fat_pct REAL,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_measurements_client_id ON measurements(client_id);
"#;

/// SQL for the schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
