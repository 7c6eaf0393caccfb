//! Daily agenda assembly.
//!
//! Merges the three sources of scheduled work for a client and date:
//! ad-hoc workout assignments, the enrolled program's slot for that
//! date, and single-exercise assignments. Sources are additive; a
//! pinned workout never hides the program's workout for the same day.

use chrono::NaiveDate;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::clients::types::{Client, ClientExercise, ClientWorkout};
use crate::exercises::library::{ExerciseLibrary, LibraryError};
use crate::exercises::types::Exercise;
use crate::programs::resolver::{resolve_workout_for_date, resolve_workout_for_date_compressed};
use crate::programs::store::ProgramStore;
use crate::programs::types::{Program, ProgramError};
use crate::workouts::store::WorkoutStore;
use crate::workouts::types::{Workout, WorkoutError};

/// Errors surfaced while assembling an agenda.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Workout lookup failed: {0}")]
    Workout(#[from] WorkoutError),

    #[error("Program lookup failed: {0}")]
    Program(#[from] ProgramError),

    #[error("Exercise lookup failed: {0}")]
    Library(#[from] LibraryError),
}

/// One entry on a client's calendar for a given date.
#[derive(Debug, Clone)]
pub enum CalendarItem {
    /// A workout snapshot pinned directly to this date.
    AssignedWorkout(ClientWorkout),
    /// The workout the enrolled program schedules for this date.
    ProgramWorkout {
        workout: Workout,
        program_title: String,
    },
    /// A single ad-hoc exercise assignment. `exercise` is `None` when
    /// the referenced exercise no longer exists; the assignment is
    /// still shown so the coach can see what was prescribed.
    SingleExercise {
        assignment: ClientExercise,
        exercise: Option<Exercise>,
    },
}

/// What a client should do today, in priority order.
#[derive(Debug, Clone)]
pub enum TodayWorkout {
    /// An ad-hoc workout pinned to today wins over everything else.
    Assigned(ClientWorkout),
    /// Today's slot in the client's enrolled program.
    Program {
        workout: Workout,
        program_title: String,
    },
    /// No assignment and no program: an arbitrary library workout so
    /// the session flow stays usable.
    Demo(Workout),
    /// Enrolled, but today is a rest day (or the program has ended).
    Rest,
}

/// Builds per-date agendas for clients.
pub struct AgendaBuilder<'a> {
    conn: &'a Connection,
}

impl<'a> AgendaBuilder<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All calendar items for a client on a date. Sources merge
    /// additively; order is assigned workouts, then the program slot,
    /// then single exercises.
    pub fn items_for_date(
        &self,
        client: &Client,
        date: NaiveDate,
    ) -> Result<Vec<CalendarItem>, CalendarError> {
        let mut items = Vec::new();

        for workout in &client.assigned_workouts {
            if workout.assigned_date == date {
                items.push(CalendarItem::AssignedWorkout(workout.clone()));
            }
        }

        if let Some((workout, program)) = self.program_workout_for_date(client, date, false)? {
            items.push(CalendarItem::ProgramWorkout {
                workout,
                program_title: program.title,
            });
        }

        let library = ExerciseLibrary::new(self.conn);
        for assignment in &client.assigned_exercises {
            if assignment.assigned_date == date {
                let exercise = library.get(assignment.exercise_id)?;
                items.push(CalendarItem::SingleExercise {
                    assignment: assignment.clone(),
                    exercise,
                });
            }
        }

        Ok(items)
    }

    /// Resolve the single workout a client should run today.
    ///
    /// An ad-hoc assignment dated today takes priority. Otherwise the
    /// enrolled program decides, and a rest slot (or a schedule that
    /// has run out) is an explicit rest day. A client with neither
    /// falls back to the first library workout as a demo.
    pub fn resolve_today(
        &self,
        client: &Client,
        today: NaiveDate,
    ) -> Result<TodayWorkout, CalendarError> {
        if let Some(assigned) = client
            .assigned_workouts
            .iter()
            .find(|w| w.assigned_date == today && !w.completed)
        {
            return Ok(TodayWorkout::Assigned(assigned.clone()));
        }

        if client.assigned_program_id.is_some() {
            return match self.program_workout_for_date(client, today, true)? {
                Some((workout, program)) => Ok(TodayWorkout::Program {
                    workout,
                    program_title: program.title,
                }),
                None => Ok(TodayWorkout::Rest),
            };
        }

        let workouts = WorkoutStore::new(self.conn).get_all()?;
        match workouts.into_iter().next() {
            Some(workout) => Ok(TodayWorkout::Demo(workout)),
            None => Ok(TodayWorkout::Rest),
        }
    }

    /// Look up the program slot for a date and load the workout it
    /// references. A rest slot, a date outside the program, or a
    /// stale workout id all resolve to `None`.
    ///
    /// `compressed` selects the legacy four-slot week layout kept for
    /// schedules authored before days were addressed directly.
    fn program_workout_for_date(
        &self,
        client: &Client,
        date: NaiveDate,
        compressed: bool,
    ) -> Result<Option<(Workout, Program)>, CalendarError> {
        let (Some(program_id), Some(start)) =
            (client.assigned_program_id, client.program_start_date)
        else {
            return Ok(None);
        };

        let Some(program) = ProgramStore::new(self.conn).get(program_id)? else {
            return Ok(None);
        };

        let workout_id = if compressed {
            resolve_workout_for_date_compressed(&program, start, date)
        } else {
            resolve_workout_for_date(&program, start, date)
        };
        let Some(workout_id) = workout_id else {
            return Ok(None);
        };

        self.load_workout(workout_id, &program)
    }

    fn load_workout(
        &self,
        workout_id: Uuid,
        program: &Program,
    ) -> Result<Option<(Workout, Program)>, CalendarError> {
        match WorkoutStore::new(self.conn).get(workout_id)? {
            Some(workout) => Ok(Some((workout, program.clone()))),
            None => {
                // Stale schedule entry, treated as rest
                tracing::warn!(
                    "Program '{}' references missing workout {}",
                    program.title,
                    workout_id
                );
                Ok(None)
            }
        }
    }
}
