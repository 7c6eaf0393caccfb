//! Live session engine.
//!
//! Drives one workout from first set to closing log. The engine owns a
//! precomputed playback sequence and a cursor into it; every mutation
//! goes through the engine so the invariants hold: the sequence never
//! changes length mid-session, completing a set may start a rest timer
//! and advances the cursor, and nothing mutates after the session
//! finishes.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::clients::types::{ClientWorkout, LoggedExercise, SetLog, WorkoutLog};
use crate::exercises::library::ExerciseLibrary;
use crate::exercises::matching::find_match;
use crate::exercises::types::{Difficulty, Exercise, MuscleGroup};
use crate::storage::config::SessionSettings;
use crate::workouts::reps::RepTarget;
use crate::workouts::sequencer::{build_playback_sequence, PlaybackStep};
use crate::workouts::types::{Workout, WorkoutExercise};

use super::types::{RestTimer, SessionError, SessionStatus};

/// Placeholder name shown when an exercise reference no longer resolves.
const UNKNOWN_EXERCISE: &str = "Unknown exercise";

/// Seconds added per rest extension when no settings are supplied.
const DEFAULT_REST_INCREMENT_SECS: u32 = 30;

/// State machine for one training session.
pub struct SessionEngine {
    /// Source template id, carried into the log for provenance
    workout_id: Option<Uuid>,
    title: String,
    date: NaiveDate,
    /// The planned exercises. Substitutions rewrite the identity of an
    /// entry but never add or remove entries.
    exercises: Vec<WorkoutExercise>,
    /// Display name per exercise, parallel to `exercises`
    names: Vec<String>,
    /// Superset-aware playback order, fixed at start
    sequence: Vec<PlaybackStep>,
    /// Position of the next set to perform
    cursor: usize,
    status: SessionStatus,
    /// Per-exercise set logs, pre-sized to the planned set counts
    logs: Vec<Vec<SetLog>>,
    rest_timer: RestTimer,
    /// Seconds added per `extend_rest` call, taken from settings
    rest_increment_secs: u32,
    /// Built once; kept so a failed persistence handoff can be retried
    finished_log: Option<WorkoutLog>,
}

impl SessionEngine {
    /// Start a session from a workout template.
    pub fn from_workout(
        workout: &Workout,
        date: NaiveDate,
        library: &ExerciseLibrary,
    ) -> Result<Self, SessionError> {
        Self::start(
            Some(workout.id),
            workout.title.clone(),
            workout.exercises.clone(),
            date,
            library,
        )
    }

    /// Start a session from a client's pinned assignment.
    pub fn from_assignment(
        assignment: &ClientWorkout,
        library: &ExerciseLibrary,
    ) -> Result<Self, SessionError> {
        Self::start(
            assignment.workout_id,
            assignment.title.clone(),
            assignment.exercises.clone(),
            assignment.assigned_date,
            library,
        )
    }

    fn start(
        workout_id: Option<Uuid>,
        title: String,
        exercises: Vec<WorkoutExercise>,
        date: NaiveDate,
        library: &ExerciseLibrary,
    ) -> Result<Self, SessionError> {
        if exercises.is_empty() {
            return Err(SessionError::EmptyWorkout);
        }

        let mut names = Vec::with_capacity(exercises.len());
        for exercise in &exercises {
            let name = library
                .get(exercise.exercise_id)?
                .map(|e| e.name)
                .unwrap_or_else(|| UNKNOWN_EXERCISE.to_string());
            names.push(name);
        }

        let sequence = build_playback_sequence(&exercises);
        let logs = exercises
            .iter()
            .map(|e| vec![SetLog::default(); e.sets as usize])
            .collect();

        tracing::info!("Session started: '{}' ({} steps)", title, sequence.len());

        Ok(Self {
            workout_id,
            title,
            date,
            exercises,
            names,
            sequence,
            cursor: 0,
            status: SessionStatus::InProgress,
            logs,
            rest_timer: RestTimer::default(),
            rest_increment_secs: DEFAULT_REST_INCREMENT_SECS,
            finished_log: None,
        })
    }

    /// Apply the configured session settings.
    pub fn with_settings(mut self, settings: &SessionSettings) -> Self {
        self.rest_increment_secs = settings.rest_increment_secs;
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn rest_timer(&self) -> &RestTimer {
        &self.rest_timer
    }

    pub fn sequence(&self) -> &[PlaybackStep] {
        &self.sequence
    }

    /// The set the client should perform next. `None` once every step
    /// has been passed.
    pub fn active_step(&self) -> Option<&PlaybackStep> {
        self.sequence.get(self.cursor)
    }

    /// The planned exercise behind the active step.
    pub fn active_exercise(&self) -> Option<(&WorkoutExercise, &str)> {
        let step = self.active_step()?;
        let exercise = self.exercises.get(step.exercise_index)?;
        let name = self.names.get(step.exercise_index)?;
        Some((exercise, name.as_str()))
    }

    /// Recorded sets for one exercise.
    pub fn set_logs(&self, exercise_index: usize) -> Option<&[SetLog]> {
        self.logs.get(exercise_index).map(Vec::as_slice)
    }

    /// Toggle completion of one set.
    ///
    /// Un-completing a done set just clears the flag; the entered
    /// weight and reps stay. Completing is only honored for the active
    /// step: blank fields are filled from the rep target before
    /// marking done, the exercise's rest timer starts if it has one,
    /// and the cursor advances. Completing the final step closes the
    /// session.
    pub fn toggle_set_complete(
        &mut self,
        exercise_index: usize,
        set_index: usize,
    ) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.check_indices(exercise_index, set_index)?;

        if self.logs[exercise_index][set_index].completed {
            self.logs[exercise_index][set_index].completed = false;
            return Ok(());
        }

        let Some(step) = self.active_step() else {
            return Ok(());
        };
        if step.exercise_index != exercise_index || step.set_index != set_index {
            // Only the active set can be completed
            return Ok(());
        }

        let exercise = &self.exercises[exercise_index];
        let rest_seconds = exercise.rest_seconds;
        let target = RepTarget::parse(&exercise.reps);

        let log = &mut self.logs[exercise_index][set_index];
        if log.reps.is_empty() {
            log.reps = target.default_log_reps().to_string();
        }
        if log.weight.is_empty() {
            log.weight = "0".to_string();
        }
        log.completed = true;

        if rest_seconds > 0 {
            self.rest_timer.start(rest_seconds);
        }

        self.advance();
        Ok(())
    }

    /// Skip the active set without recording it.
    pub fn skip_set(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;

        self.rest_timer.cancel();
        self.advance();
        Ok(())
    }

    /// Advance the session clock by one second.
    pub fn tick(&mut self) {
        if self.status == SessionStatus::InProgress {
            self.rest_timer.tick();
        }
    }

    /// Add time to the running rest timer.
    pub fn add_rest_time(&mut self, seconds: u32) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.rest_timer.extend(seconds);
        Ok(())
    }

    /// Add the configured increment to the running rest timer.
    pub fn extend_rest(&mut self) -> Result<(), SessionError> {
        self.add_rest_time(self.rest_increment_secs)
    }

    /// Dismiss the rest timer early.
    pub fn skip_rest(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.rest_timer.cancel();
        Ok(())
    }

    /// Move the cursor to an exercise's first step.
    ///
    /// The rest timer keeps running; jumping around the plan is a
    /// navigation action, not a rest decision.
    pub fn jump_to_exercise(&mut self, exercise_index: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;

        let position = self
            .sequence
            .iter()
            .position(|s| s.exercise_index == exercise_index)
            .ok_or(SessionError::InvalidExercise(exercise_index))?;

        self.cursor = position;
        Ok(())
    }

    /// Substitute the exercise behind a plan entry.
    ///
    /// The substitute is matched against the library first so an
    /// existing definition is reused rather than duplicated. When
    /// nothing matches, the candidate is applied anyway as a
    /// session-local override: a fresh definition carrying the
    /// candidate's name and notes, living only in this session and
    /// its log, never inserted into the library. Either way the
    /// entry's identity (id and display name) is rewritten in place;
    /// sets, rest, sequencing, and any logs already recorded are
    /// untouched. Returns the definition now behind the entry.
    pub fn apply_swap(
        &mut self,
        exercise_index: usize,
        substitute_name: &str,
        substitute_notes: Option<&str>,
        library: &ExerciseLibrary,
    ) -> Result<Exercise, SessionError> {
        self.ensure_in_progress()?;
        if exercise_index >= self.exercises.len() {
            return Err(SessionError::InvalidExercise(exercise_index));
        }

        let candidates = library.get_all()?;
        let substitute = match find_match(substitute_name, &candidates) {
            Some(matched) => matched.clone(),
            None => {
                tracing::debug!(
                    "No library match for substitute '{}', applying session-local override",
                    substitute_name
                );
                // A substitute targets the same muscles as the entry
                // it replaces, so inherit the slot's muscle group
                let muscle_group = library
                    .get(self.exercises[exercise_index].exercise_id)?
                    .map(|e| e.muscle_group)
                    .unwrap_or(MuscleGroup::FullBody);
                let mut exercise =
                    Exercise::new(substitute_name, muscle_group, Difficulty::default());
                if let Some(notes) = substitute_notes {
                    exercise = exercise.with_description(notes);
                }
                exercise
            }
        };

        tracing::info!(
            "Swapped '{}' for '{}'",
            self.names[exercise_index],
            substitute.name
        );
        self.exercises[exercise_index].exercise_id = substitute.id;
        self.names[exercise_index] = substitute.name.clone();
        Ok(substitute)
    }

    /// Overwrite the recorded weight and reps for one set.
    pub fn update_set_log(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        weight: impl Into<String>,
        reps: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.check_indices(exercise_index, set_index)?;

        let log = &mut self.logs[exercise_index][set_index];
        log.weight = weight.into();
        log.reps = reps.into();
        Ok(())
    }

    /// Close the session and return its log.
    ///
    /// Idempotent: calling again returns the same log, so a caller
    /// whose persistence attempt failed can retry the handoff.
    pub fn finish(&mut self) -> WorkoutLog {
        if let Some(log) = &self.finished_log {
            return log.clone();
        }

        let entries = self
            .exercises
            .iter()
            .zip(&self.names)
            .zip(&self.logs)
            .map(|((exercise, name), sets)| LoggedExercise {
                exercise_id: exercise.exercise_id,
                exercise_name: name.clone(),
                sets: sets.clone(),
            })
            .collect();

        let log = WorkoutLog {
            id: Uuid::new_v4(),
            date: self.date,
            workout_id: self.workout_id,
            title: self.title.clone(),
            entries,
        };

        self.status = SessionStatus::Finished;
        self.rest_timer.cancel();
        self.finished_log = Some(log.clone());

        tracing::info!("Session finished: '{}'", self.title);
        log
    }

    fn advance(&mut self) {
        if self.cursor < self.sequence.len() {
            self.cursor += 1;
        }
        if self.cursor >= self.sequence.len() {
            self.finish();
        }
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Finished {
            return Err(SessionError::SessionFinished);
        }
        Ok(())
    }

    fn check_indices(&self, exercise_index: usize, set_index: usize) -> Result<(), SessionError> {
        let sets = self
            .logs
            .get(exercise_index)
            .ok_or(SessionError::InvalidExercise(exercise_index))?;
        if set_index >= sets.len() {
            return Err(SessionError::InvalidSet {
                exercise: exercise_index,
                set: set_index,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::types::{Difficulty, MuscleGroup};
    use crate::storage::database::Database;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A two-exercise superset followed by one plain exercise.
    fn sample_workout(ids: &[Uuid]) -> Workout {
        let mut a = WorkoutExercise::new(ids[0], 2, "10", 0);
        a.superset_id = Some("ss1".to_string());
        let mut b = WorkoutExercise::new(ids[1], 2, "8-12", 0);
        b.superset_id = Some("ss1".to_string());
        let c = WorkoutExercise::new(ids[2], 1, "amrap", 90);

        Workout::new("Push Day".to_string(), "strength".to_string(), vec![a, b, c])
    }

    fn setup() -> (Database, Vec<Uuid>) {
        let db = Database::open_in_memory().unwrap();
        let library = ExerciseLibrary::new(db.connection());

        let mut ids = Vec::new();
        for name in ["Bench Press", "Bent-Over Row", "Push-Up"] {
            let exercise = Exercise::new(name, MuscleGroup::Chest, Difficulty::Intermediate);
            library.insert(&exercise).unwrap();
            ids.push(exercise.id);
        }
        (db, ids)
    }

    fn start_engine(db: &Database, ids: &[Uuid]) -> SessionEngine {
        let library = ExerciseLibrary::new(db.connection());
        SessionEngine::from_workout(&sample_workout(ids), date(2024, 6, 10), &library).unwrap()
    }

    #[test]
    fn test_empty_workout_rejected() {
        let db = Database::open_in_memory().unwrap();
        let library = ExerciseLibrary::new(db.connection());
        let workout = Workout::new("Empty".to_string(), "strength".to_string(), vec![]);

        assert!(matches!(
            SessionEngine::from_workout(&workout, date(2024, 6, 10), &library),
            Err(SessionError::EmptyWorkout)
        ));
    }

    #[test]
    fn test_superset_alternation() {
        let (db, ids) = setup();
        let engine = start_engine(&db, &ids);

        let order: Vec<usize> = engine.sequence().iter().map(|s| s.exercise_index).collect();
        assert_eq!(order, vec![0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_complete_set_fills_defaults_and_advances() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        engine.toggle_set_complete(0, 0).unwrap();

        let logs = engine.set_logs(0).unwrap();
        assert!(logs[0].completed);
        assert_eq!(logs[0].reps, "10");
        assert_eq!(logs[0].weight, "0");

        // Advanced to the superset partner
        let step = engine.active_step().unwrap();
        assert_eq!(step.exercise_index, 1);
        assert_eq!(step.set_index, 0);
    }

    #[test]
    fn test_range_target_defaults_to_low_end() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        engine.toggle_set_complete(0, 0).unwrap();
        engine.toggle_set_complete(1, 0).unwrap();

        assert_eq!(engine.set_logs(1).unwrap()[0].reps, "8");
    }

    #[test]
    fn test_completing_non_active_set_is_ignored() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        // Active step is exercise 0 set 0; exercise 2 is not up yet
        engine.toggle_set_complete(2, 0).unwrap();
        assert!(!engine.set_logs(2).unwrap()[0].completed);
        assert_eq!(engine.active_step().unwrap().exercise_index, 0);
    }

    #[test]
    fn test_uncomplete_keeps_entered_values() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        engine.update_set_log(0, 0, "60", "9").unwrap();
        engine.toggle_set_complete(0, 0).unwrap();
        engine.toggle_set_complete(0, 0).unwrap();

        let log = &engine.set_logs(0).unwrap()[0];
        assert!(!log.completed);
        assert_eq!(log.weight, "60");
        assert_eq!(log.reps, "9");
    }

    #[test]
    fn test_rest_timer_lifecycle() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        // First two exercises have no rest; skip to the plain one
        engine.jump_to_exercise(2).unwrap();
        engine.toggle_set_complete(2, 0).unwrap();

        // Final set completion finishes the session and cancels rest
        assert_eq!(engine.status(), SessionStatus::Finished);
        assert!(!engine.rest_timer().active);
    }

    #[test]
    fn test_rest_timer_tick_and_extend() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        // Reorder so the rest-bearing exercise is mid-session
        engine.jump_to_exercise(2).unwrap();
        // Manually drive the timer through its API
        engine.rest_timer.start(90);
        engine.add_rest_time(30).unwrap();
        assert_eq!(engine.rest_timer().time_left, 120);
        assert_eq!(engine.rest_timer().total_time, 120);

        for _ in 0..119 {
            engine.tick();
        }
        assert!(engine.rest_timer().active);
        engine.tick();
        assert!(!engine.rest_timer().active);
        assert_eq!(engine.rest_timer().time_left, 0);
    }

    #[test]
    fn test_skip_set_cancels_rest() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        engine.rest_timer.start(60);
        engine.skip_set().unwrap();

        assert!(!engine.rest_timer().active);
        assert_eq!(engine.active_step().unwrap().exercise_index, 1);
        assert!(!engine.set_logs(0).unwrap()[0].completed);
    }

    #[test]
    fn test_jump_to_exercise_keeps_timer() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        engine.rest_timer.start(60);
        engine.jump_to_exercise(2).unwrap();

        assert!(engine.rest_timer().active);
        assert_eq!(engine.active_step().unwrap().exercise_index, 2);
    }

    #[test]
    fn test_swap_changes_identity_only() {
        let (db, ids) = setup();
        let library = ExerciseLibrary::new(db.connection());
        let substitute = Exercise::new("Incline Dumbbell Press", MuscleGroup::Chest, Difficulty::Intermediate);
        library.insert(&substitute).unwrap();

        let mut engine = start_engine(&db, &ids);
        engine.update_set_log(0, 0, "60", "10").unwrap();
        let sequence_before = engine.sequence().to_vec();

        let matched = engine
            .apply_swap(0, "incline dumbbell press", None, &library)
            .unwrap();
        assert_eq!(matched.id, substitute.id);

        // Sequence, cursor, and logs are untouched
        assert_eq!(engine.sequence(), sequence_before.as_slice());
        assert_eq!(engine.active_step().unwrap().exercise_index, 0);
        assert_eq!(engine.set_logs(0).unwrap()[0].weight, "60");

        let log = engine.finish();
        assert_eq!(log.entries[0].exercise_id, substitute.id);
        assert_eq!(log.entries[0].exercise_name, "Incline Dumbbell Press");
    }

    #[test]
    fn test_swap_without_match_applies_override() {
        let (db, ids) = setup();
        let library = ExerciseLibrary::new(db.connection());
        let mut engine = start_engine(&db, &ids);
        let sequence_before = engine.sequence().to_vec();

        let applied = engine
            .apply_swap(0, "Weighted Ring Dip", Some("Less shoulder strain"), &library)
            .unwrap();
        assert_ne!(applied.id, ids[0]);
        assert_eq!(applied.name, "Weighted Ring Dip");
        assert_eq!(applied.description, "Less shoulder strain");
        // Inherits the replaced slot's muscle group, stays out of the library
        assert_eq!(applied.muscle_group, MuscleGroup::Chest);
        assert!(library.get(applied.id).unwrap().is_none());

        // Sequence and cursor are untouched; the log carries the override
        assert_eq!(engine.sequence(), sequence_before.as_slice());
        assert_eq!(engine.active_step().unwrap().exercise_index, 0);

        let log = engine.finish();
        assert_eq!(log.entries[0].exercise_id, applied.id);
        assert_eq!(log.entries[0].exercise_name, "Weighted Ring Dip");
    }

    #[test]
    fn test_rest_increment_comes_from_settings() {
        let (db, ids) = setup();
        let settings = SessionSettings {
            rest_increment_secs: 45,
        };
        let mut engine = start_engine(&db, &ids).with_settings(&settings);

        engine.rest_timer.start(60);
        engine.extend_rest().unwrap();
        assert_eq!(engine.rest_timer().time_left, 105);
        assert_eq!(engine.rest_timer().total_time, 105);
    }

    #[test]
    fn test_finish_builds_complete_log() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        // Work through every step in playback order
        while let Some(step) = engine.active_step().cloned() {
            engine
                .toggle_set_complete(step.exercise_index, step.set_index)
                .unwrap();
            if engine.status() == SessionStatus::Finished {
                break;
            }
        }

        let log = engine.finish();
        assert_eq!(log.title, "Push Day");
        assert_eq!(log.entries.len(), 3);
        assert_eq!(log.entries[0].sets.len(), 2);
        assert_eq!(log.entries[2].sets.len(), 1);
        assert!(log.entries.iter().all(|e| e.sets.iter().all(|s| s.completed)));
        // Max-effort targets default to the fixed estimate
        assert_eq!(log.entries[2].sets[0].reps, "12");
    }

    #[test]
    fn test_finished_session_rejects_mutation() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        let first = engine.finish();
        assert!(matches!(
            engine.toggle_set_complete(0, 0),
            Err(SessionError::SessionFinished)
        ));
        assert!(matches!(
            engine.update_set_log(0, 0, "60", "10"),
            Err(SessionError::SessionFinished)
        ));

        // Finish is idempotent so the handoff can retry
        let second = engine.finish();
        assert_eq!(first.id, second.id);
        assert_eq!(first.entries.len(), second.entries.len());
    }

    #[test]
    fn test_out_of_range_indices() {
        let (db, ids) = setup();
        let mut engine = start_engine(&db, &ids);

        assert!(matches!(
            engine.toggle_set_complete(9, 0),
            Err(SessionError::InvalidExercise(9))
        ));
        assert!(matches!(
            engine.update_set_log(0, 9, "60", "10"),
            Err(SessionError::InvalidSet { .. })
        ));
        assert!(matches!(
            engine.jump_to_exercise(9),
            Err(SessionError::InvalidExercise(9))
        ));
    }

    #[test]
    fn test_stale_exercise_reference_gets_placeholder_name() {
        let db = Database::open_in_memory().unwrap();
        let library = ExerciseLibrary::new(db.connection());

        let workout = Workout::new(
            "Ghost".to_string(),
            "strength".to_string(),
            vec![WorkoutExercise::new(Uuid::new_v4(), 1, "10", 0)],
        );
        let mut engine =
            SessionEngine::from_workout(&workout, date(2024, 6, 10), &library).unwrap();

        let (_, name) = engine.active_exercise().unwrap();
        assert_eq!(name, "Unknown exercise");

        let log = engine.finish();
        assert_eq!(log.entries[0].exercise_name, "Unknown exercise");
    }
}
