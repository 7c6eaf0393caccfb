//! Program schedule resolution.
//!
//! Maps a calendar date to the workout (or rest) a client's program
//! prescribes for that date. Pure date arithmetic on `NaiveDate`, so
//! daylight-saving and partial-day offsets cannot skew the week/day
//! math.
//!
//! Two slot-mapping strategies exist. The canonical one indexes the
//! seven-slot week directly and is used everywhere a full week is
//! displayed or resolved. The compressed mapping predates seven-slot
//! authoring (weeks holding up to four workouts at fixed offsets) and is
//! kept only for the client-app "today" resolver; the two are not
//! interchangeable and are deliberately not unified.

use chrono::NaiveDate;
use uuid::Uuid;

use super::types::Program;

/// Position of a date within a program's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDay {
    /// 1-based program week
    pub week: u32,
    /// 0-based day within that week (0 = first day of the week)
    pub day_index: u32,
}

/// Locate a date within a program that started on `start_date`.
///
/// Returns `None` when the date precedes the start. Dates past the last
/// authored week still resolve to a position; the schedule lookup then
/// degrades to rest.
pub fn program_day_for_date(start_date: NaiveDate, target_date: NaiveDate) -> Option<ProgramDay> {
    let diff_days = (target_date - start_date).num_days();
    if diff_days < 0 {
        return None;
    }

    Some(ProgramDay {
        week: (diff_days / 7) as u32 + 1,
        day_index: (diff_days % 7) as u32,
    })
}

/// Resolve the workout a program prescribes for a date.
///
/// Canonical direct seven-slot lookup: `schedule[week][day_index]`.
/// Missing weeks (unauthored, or past the program's end) and empty slots
/// are rest days. Pure and deterministic.
pub fn resolve_workout_for_date(
    program: &Program,
    start_date: NaiveDate,
    target_date: NaiveDate,
) -> Option<Uuid> {
    let day = program_day_for_date(start_date, target_date)?;

    let week = program.schedule.get(&day.week)?;
    week.get(day.day_index as usize).copied().flatten()
}

/// Resolve a date against a compressed four-slot week.
///
/// Legacy convention where only up to four workouts are authored per
/// week at fixed offsets: day 0 -> slot 0, day 2 -> slot 1, day 4 ->
/// slot 2, any other odd day -> slot 3 when present. Day 6 is always
/// rest. Used only by the client-app today resolver for data authored
/// before seven-slot weeks.
pub fn resolve_workout_for_date_compressed(
    program: &Program,
    start_date: NaiveDate,
    target_date: NaiveDate,
) -> Option<Uuid> {
    let day = program_day_for_date(start_date, target_date)?;
    let week = program.schedule.get(&day.week)?;

    let slot = match day.day_index {
        0 => 0,
        2 => 1,
        4 => 2,
        1 | 3 | 5 => 3,
        _ => return None,
    };

    week.get(slot).copied().flatten()
}
