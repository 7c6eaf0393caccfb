//! Workout duration estimation.
//!
//! A pure estimate used by the builder whenever the exercise list
//! changes. Shares the reps parser with the session engine so the
//! estimate and playback never interpret a reps string differently.

use super::reps::RepTarget;
use super::types::WorkoutExercise;

/// Transition overhead between exercises in the same superset (seconds).
const SUPERSET_TRANSITION_SECONDS: u32 = 15;

/// Transition overhead between unrelated exercises (seconds).
const STANDARD_TRANSITION_SECONDS: u32 = 90;

/// Fixed warm-up / cool-down buffer (seconds).
const SESSION_BUFFER_SECONDS: u32 = 300;

/// Seconds per rep assumed for a workout type.
fn seconds_per_rep(workout_type: &str) -> f64 {
    match workout_type.to_lowercase().as_str() {
        "strength" => 6.0,
        "hiit" | "endurance" => 2.5,
        "mobility" => 5.0,
        _ => 4.0,
    }
}

/// Estimate a workout's total duration in minutes.
///
/// Per exercise: `sets * (avg_reps * seconds_per_rep) + sets * rest`.
/// Timed rep targets ("30s") override the per-rep math with the hold
/// duration itself. Back-to-back superset members get a short transition;
/// everything else assumes an equipment change.
pub fn estimate_duration_minutes(exercises: &[WorkoutExercise], workout_type: &str) -> u32 {
    if exercises.is_empty() {
        return 0;
    }

    let per_rep = seconds_per_rep(workout_type);
    let mut total_seconds = 0f64;

    for (i, exercise) in exercises.iter().enumerate() {
        let target = RepTarget::parse(&exercise.reps);

        let work_per_set = match target.seconds_override() {
            Some(hold) => hold as f64,
            None => target.average_reps() * per_rep,
        };

        total_seconds += exercise.sets as f64 * work_per_set;
        total_seconds += (exercise.sets * exercise.rest_seconds) as f64;

        if let Some(next) = exercises.get(i + 1) {
            let same_group = exercise.superset_id.is_some()
                && exercise.superset_id == next.superset_id;
            total_seconds += if same_group {
                SUPERSET_TRANSITION_SECONDS as f64
            } else {
                STANDARD_TRANSITION_SECONDS as f64
            };
        }
    }

    total_seconds += SESSION_BUFFER_SECONDS as f64;

    (total_seconds / 60.0).round() as u32
}
