//! End-to-end scheduling tests: programs, agendas, and deletion guards
//! working against one shared database.

use chrono::NaiveDate;
use uuid::Uuid;

use repcoach::calendar::agenda::{AgendaBuilder, CalendarItem, TodayWorkout};
use repcoach::clients::store::ClientStore;
use repcoach::clients::types::{Client, ClientWorkout};
use repcoach::programs::store::ProgramStore;
use repcoach::programs::types::{Program, DAYS_PER_WEEK};
use repcoach::storage::database::Database;
use repcoach::workouts::store::WorkoutStore;
use repcoach::workouts::types::{Workout, WorkoutError, WorkoutExercise};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn strength_workout(title: &str) -> Workout {
    Workout::new(
        title.to_string(),
        "strength".to_string(),
        vec![
            WorkoutExercise::new(Uuid::new_v4(), 3, "8-12", 90),
            WorkoutExercise::new(Uuid::new_v4(), 3, "10", 60),
        ],
    )
}

fn empty_week() -> Vec<Option<Uuid>> {
    vec![None; DAYS_PER_WEEK]
}

#[test]
fn test_program_resolution_over_multiple_weeks() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let workouts = WorkoutStore::new(conn);
    let programs = ProgramStore::new(conn);

    let push = strength_workout("Push");
    let pull = strength_workout("Pull");
    workouts.insert(&push).unwrap();
    workouts.insert(&pull).unwrap();

    // Week 1: push on day 0. Week 2: pull on day 3. Week 3 unauthored.
    let mut program = Program::new("Upper Block", 3);
    let mut week1 = empty_week();
    week1[0] = Some(push.id);
    program.set_week(1, week1);
    let mut week2 = empty_week();
    week2[3] = Some(pull.id);
    program.set_week(2, week2);
    programs.insert(&program).unwrap();

    let mut client = Client::new("Ada");
    client.assigned_program_id = Some(program.id);
    client.program_start_date = Some(date(2024, 6, 10));
    ClientStore::new(conn).insert(&client).unwrap();

    let agenda = AgendaBuilder::new(conn);

    // Week 1 day 0
    let items = agenda.items_for_date(&client, date(2024, 6, 10)).unwrap();
    assert_eq!(items.len(), 1);
    match &items[0] {
        CalendarItem::ProgramWorkout { workout, program_title } => {
            assert_eq!(workout.title, "Push");
            assert_eq!(program_title, "Upper Block");
        }
        other => panic!("unexpected item: {:?}", other),
    }

    // Week 1 day 1 is rest
    assert!(agenda
        .items_for_date(&client, date(2024, 6, 11))
        .unwrap()
        .is_empty());

    // Week 2 day 3
    let items = agenda.items_for_date(&client, date(2024, 6, 20)).unwrap();
    assert_eq!(items.len(), 1);
    match &items[0] {
        CalendarItem::ProgramWorkout { workout, .. } => assert_eq!(workout.title, "Pull"),
        other => panic!("unexpected item: {:?}", other),
    }

    // Unauthored week 3 and dates past the program are rest, never errors
    assert!(agenda
        .items_for_date(&client, date(2024, 6, 24))
        .unwrap()
        .is_empty());
    assert!(agenda
        .items_for_date(&client, date(2025, 1, 6))
        .unwrap()
        .is_empty());

    // Dates before enrollment resolve to nothing
    assert!(agenda
        .items_for_date(&client, date(2024, 6, 3))
        .unwrap()
        .is_empty());
}

#[test]
fn test_agenda_sources_are_additive() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let workouts = WorkoutStore::new(conn);
    let programs = ProgramStore::new(conn);

    let scheduled = strength_workout("Scheduled");
    workouts.insert(&scheduled).unwrap();

    let mut program = Program::new("Block", 4);
    let mut week = empty_week();
    week[0] = Some(scheduled.id);
    program.set_week(1, week);
    programs.insert(&program).unwrap();

    let pinned = strength_workout("Pinned");
    let mut client = Client::new("Ada");
    client.assigned_program_id = Some(program.id);
    client.program_start_date = Some(date(2024, 6, 10));
    client
        .assigned_workouts
        .push(ClientWorkout::from_template(&pinned, date(2024, 6, 10)));

    let items = AgendaBuilder::new(conn)
        .items_for_date(&client, date(2024, 6, 10))
        .unwrap();

    // The pinned workout does not hide the program's slot
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0], CalendarItem::AssignedWorkout(_)));
    assert!(matches!(items[1], CalendarItem::ProgramWorkout { .. }));
}

#[test]
fn test_today_resolution_priority_chain() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let workouts = WorkoutStore::new(conn);
    let programs = ProgramStore::new(conn);
    let agenda = AgendaBuilder::new(conn);

    let demo = strength_workout("Demo");
    workouts.insert(&demo).unwrap();

    // No program, no assignment: demo fallback
    let mut client = Client::new("Ada");
    assert!(matches!(
        agenda.resolve_today(&client, date(2024, 6, 10)).unwrap(),
        TodayWorkout::Demo(_)
    ));

    // Enrolled with a rest slot today: rest, not demo
    let program = Program::new("Block", 4);
    programs.insert(&program).unwrap();
    client.assigned_program_id = Some(program.id);
    client.program_start_date = Some(date(2024, 6, 10));
    assert!(matches!(
        agenda.resolve_today(&client, date(2024, 6, 10)).unwrap(),
        TodayWorkout::Rest
    ));

    // A pinned workout for today beats the program
    client
        .assigned_workouts
        .push(ClientWorkout::from_template(&demo, date(2024, 6, 10)));
    assert!(matches!(
        agenda.resolve_today(&client, date(2024, 6, 10)).unwrap(),
        TodayWorkout::Assigned(_)
    ));

    // Already-completed assignments are skipped
    client.assigned_workouts[0].completed = true;
    assert!(matches!(
        agenda.resolve_today(&client, date(2024, 6, 10)).unwrap(),
        TodayWorkout::Rest
    ));
}

#[test]
fn test_workout_deletion_guards() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let workouts = WorkoutStore::new(conn);
    let programs = ProgramStore::new(conn);
    let clients = ClientStore::new(conn);

    let workout = strength_workout("Leg Day");
    workouts.insert(&workout).unwrap();

    // Referenced by a program schedule: deletion refused
    let mut program = Program::new("Block", 4);
    let mut week = empty_week();
    week[2] = Some(workout.id);
    program.set_week(1, week);
    programs.insert(&program).unwrap();

    match workouts.delete(workout.id) {
        Err(WorkoutError::InUse(what)) => assert!(what.contains("Block")),
        other => panic!("expected in-use refusal, got {:?}", other),
    }
    assert!(workouts.get(workout.id).unwrap().is_some());

    // Clear the schedule; now a client assignment blocks it
    program.set_week(1, empty_week());
    programs.update(&program).unwrap();

    let mut client = Client::new("Ada");
    client
        .assigned_workouts
        .push(ClientWorkout::from_template(&workout, date(2024, 6, 10)));
    clients.insert(&client).unwrap();

    match workouts.delete(workout.id) {
        Err(WorkoutError::InUse(what)) => assert!(what.contains("Ada")),
        other => panic!("expected in-use refusal, got {:?}", other),
    }

    // Remove the client; deletion now succeeds
    clients.delete(client.id).unwrap();
    workouts.delete(workout.id).unwrap();
    assert!(workouts.get(workout.id).unwrap().is_none());
}

#[test]
fn test_program_deletion_guard() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let programs = ProgramStore::new(conn);
    let clients = ClientStore::new(conn);

    let program = Program::new("Block", 4);
    programs.insert(&program).unwrap();

    let client = Client::new("Ada");
    clients.insert(&client).unwrap();
    clients
        .assign_program(client.id, program.id, date(2024, 6, 10))
        .unwrap();

    assert!(programs.delete(program.id).is_err());

    clients.unassign_program(client.id).unwrap();
    programs.delete(program.id).unwrap();
    assert!(programs.get(program.id).unwrap().is_none());
}

#[test]
fn test_malformed_week_is_normalized_on_write() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    let programs = ProgramStore::new(conn);

    let id = Uuid::new_v4();
    let mut program = Program::new("Block", 4);
    // Short week: padded. Over-long week: truncated.
    program.set_week(1, vec![Some(id)]);
    program.set_week(2, vec![None; 10]);
    programs.insert(&program).unwrap();

    let loaded = programs.get(program.id).unwrap().unwrap();
    assert_eq!(loaded.schedule[&1].len(), DAYS_PER_WEEK);
    assert_eq!(loaded.schedule[&1][0], Some(id));
    assert_eq!(loaded.schedule[&2].len(), DAYS_PER_WEEK);
}
