//! Full session flow: resolve today's workout, play it through the
//! engine, and hand the log off to the client store.

use chrono::NaiveDate;
use uuid::Uuid;

use repcoach::calendar::agenda::{AgendaBuilder, TodayWorkout};
use repcoach::clients::store::ClientStore;
use repcoach::clients::types::Client;
use repcoach::exercises::library::ExerciseLibrary;
use repcoach::exercises::types::{Exercise, MuscleGroup};
use repcoach::session::engine::SessionEngine;
use repcoach::session::types::SessionStatus;
use repcoach::storage::database::Database;
use repcoach::workouts::duration::estimate_duration_minutes;
use repcoach::workouts::store::WorkoutStore;
use repcoach::workouts::types::{Difficulty, Workout, WorkoutExercise};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_exercise(library: &ExerciseLibrary, name: &str) -> Uuid {
    let exercise = Exercise::new(name, MuscleGroup::Chest, Difficulty::Intermediate);
    library.insert(&exercise).unwrap();
    exercise.id
}

#[test]
fn test_demo_session_end_to_end() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let library = ExerciseLibrary::new(conn);
    let workouts = WorkoutStore::new(conn);
    let clients = ClientStore::new(conn);

    let bench = seed_exercise(&library, "Bench Press");
    let row = seed_exercise(&library, "Bent-Over Row");

    let mut a = WorkoutExercise::new(bench, 2, "10", 60);
    a.superset_id = Some("ss1".to_string());
    let mut b = WorkoutExercise::new(row, 2, "8-12", 60);
    b.superset_id = Some("ss1".to_string());
    let workout = Workout::new("Upper A".to_string(), "strength".to_string(), vec![a, b]);
    workouts.insert(&workout).unwrap();

    let client = Client::new("Ada");
    clients.insert(&client).unwrap();

    // No program and nothing pinned: the agenda falls back to a demo
    let today = date(2024, 6, 10);
    let resolved = AgendaBuilder::new(conn).resolve_today(&client, today).unwrap();
    let template = match resolved {
        TodayWorkout::Demo(workout) => workout,
        other => panic!("expected demo fallback, got {:?}", other),
    };

    let mut engine = SessionEngine::from_workout(&template, today, &library).unwrap();

    // Superset round-robin: bench, row, bench, row
    let order: Vec<usize> = engine.sequence().iter().map(|s| s.exercise_index).collect();
    assert_eq!(order, vec![0, 1, 0, 1]);

    while let Some(step) = engine.active_step().cloned() {
        engine
            .toggle_set_complete(step.exercise_index, step.set_index)
            .unwrap();
        // Completing a set with rest configured starts the timer
        if engine.status() == SessionStatus::InProgress {
            assert!(engine.rest_timer().active);
            for _ in 0..60 {
                engine.tick();
            }
            assert!(!engine.rest_timer().active);
        }
    }

    assert_eq!(engine.status(), SessionStatus::Finished);
    let log = engine.finish();
    assert_eq!(log.workout_id, Some(workout.id));
    assert_eq!(log.entries.len(), 2);
    assert_eq!(log.entries[0].exercise_name, "Bench Press");
    assert_eq!(log.entries[1].sets[0].reps, "8");

    clients.apply_session_log(client.id, &log).unwrap();

    let loaded = clients.get(client.id).unwrap().unwrap();
    assert_eq!(loaded.workout_logs.len(), 1);
    assert_eq!(loaded.workout_logs[0].title, "Upper A");
    assert_eq!(loaded.workout_logs[0].entries.len(), 2);
    assert!(loaded.last_active.is_some());

    // The log survives a reload with its set data intact
    let persisted = &loaded.workout_logs[0].entries[0];
    assert_eq!(persisted.exercise_id, bench);
    assert!(persisted.sets.iter().all(|s| s.completed));
}

#[test]
fn test_substitution_mid_session_is_reflected_in_log() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let library = ExerciseLibrary::new(conn);

    let bench = seed_exercise(&library, "Barbell Bench Press");
    let dumbbell = seed_exercise(&library, "Dumbbell Bench Press");

    let workout = Workout::new(
        "Chest".to_string(),
        "strength".to_string(),
        vec![WorkoutExercise::new(bench, 2, "10", 0)],
    );

    let mut engine = SessionEngine::from_workout(&workout, date(2024, 6, 10), &library).unwrap();

    // First set logged against the original exercise
    engine.toggle_set_complete(0, 0).unwrap();

    // Shoulder complaint: swap to dumbbells for the rest of the session
    let matched = engine
        .apply_swap(0, "Dumbbell Bench Press", None, &library)
        .unwrap();
    assert_eq!(matched.id, dumbbell);

    engine.toggle_set_complete(0, 1).unwrap();

    // The whole exercise entry reports the substitute's identity
    let log = engine.finish();
    assert_eq!(log.entries[0].exercise_id, dumbbell);
    assert_eq!(log.entries[0].exercise_name, "Dumbbell Bench Press");
    assert_eq!(log.entries[0].sets.len(), 2);
}

#[test]
fn test_duration_estimate_tracks_workout_size() {
    let exercises = vec![
        WorkoutExercise::new(Uuid::new_v4(), 3, "10", 60),
        WorkoutExercise::new(Uuid::new_v4(), 3, "10", 60),
    ];
    let base = estimate_duration_minutes(&exercises, "strength");

    let mut more = exercises.clone();
    more.push(WorkoutExercise::new(Uuid::new_v4(), 3, "10", 60));
    let larger = estimate_duration_minutes(&more, "strength");

    // Adding an exercise never shortens the estimate
    assert!(larger > base);

    // Grouping into a superset shortens transitions, never lengthens
    let mut grouped = exercises.clone();
    for exercise in &mut grouped {
        exercise.superset_id = Some("ss1".to_string());
    }
    let superset = estimate_duration_minutes(&grouped, "strength");
    assert!(superset <= base);
}
