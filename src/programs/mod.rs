//! Multi-week training programs and schedule resolution.

pub mod resolver;
pub mod store;
pub mod types;

pub use resolver::{
    program_day_for_date, resolve_workout_for_date, resolve_workout_for_date_compressed,
    ProgramDay,
};
pub use store::ProgramStore;
pub use types::{Program, ProgramError, WeekSchedule, DAYS_PER_WEEK};
