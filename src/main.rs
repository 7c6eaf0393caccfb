//! RepCoach - Strength Coaching Companion
//!
//! Headless entry point: opens the local database, seeds the exercise
//! library on first run, and prints every client's agenda for today.

use anyhow::Context;
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use repcoach::calendar::agenda::{AgendaBuilder, CalendarItem};
use repcoach::clients::store::ClientStore;
use repcoach::exercises::library::ExerciseLibrary;
use repcoach::storage::config::load_config;
use repcoach::storage::database::Database;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RepCoach v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    let db = Database::open(&config.database_path()).context("Failed to open database")?;

    let library = ExerciseLibrary::new(db.connection());
    library.seed_if_empty()?;

    let today = Local::now().date_naive();
    let clients = ClientStore::new(db.connection()).get_all()?;
    let agenda = AgendaBuilder::new(db.connection());

    if clients.is_empty() {
        println!("No clients yet.");
        return Ok(());
    }

    for client in &clients {
        println!("{} - {}", client.name, today);
        let items = agenda.items_for_date(client, today)?;
        if items.is_empty() {
            println!("  Rest day");
            continue;
        }
        for item in items {
            match item {
                CalendarItem::AssignedWorkout(workout) => {
                    println!("  Workout: {}", workout.title);
                }
                CalendarItem::ProgramWorkout {
                    workout,
                    program_title,
                } => {
                    println!(
                        "  Program '{}': {} (~{} min)",
                        program_title, workout.title, workout.duration_minutes
                    );
                }
                CalendarItem::SingleExercise {
                    assignment,
                    exercise,
                } => {
                    let name = exercise
                        .map(|e| e.name)
                        .unwrap_or_else(|| "Unknown exercise".to_string());
                    println!(
                        "  Exercise: {} ({}x{})",
                        name, assignment.sets, assignment.reps
                    );
                }
            }
        }
    }

    Ok(())
}
