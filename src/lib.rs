//! RepCoach - Strength Coaching Companion
//!
//! A self-hosted coaching companion built in Rust. Manages an exercise
//! library, workout templates with superset-aware playback, multi-week
//! training programs, a client roster with per-date agendas, live
//! session execution with set logging and rest timers, and optional
//! cloud-backed exercise substitution suggestions.

pub mod ai;
pub mod calendar;
pub mod clients;
pub mod exercises;
pub mod programs;
pub mod session;
pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use calendar::agenda::AgendaBuilder;
pub use clients::store::ClientStore;
pub use exercises::library::ExerciseLibrary;
pub use programs::store::ProgramStore;
pub use session::engine::SessionEngine;
pub use storage::database::Database;
pub use workouts::store::WorkoutStore;
