//! Superset-aware playback sequencing.
//!
//! Expands a workout's ordered exercise list into a linear sequence of
//! playback steps, one step per set. Superset groups are emitted in
//! round-robin order: one set of each member per round, for as many
//! rounds as the largest member's set count. The sequence is built once
//! when a session starts and is the single source of truth for playback
//! order; exercise substitution changes identity, never cardinality.

use super::types::{WorkoutError, WorkoutExercise};

/// One unit of playback: a single set of a single exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackStep {
    /// Index into the workout's exercise array
    pub exercise_index: usize,
    /// Which set of that exercise this step performs (0-based)
    pub set_index: usize,
    /// Superset group key, if this step is part of a superset
    pub superset_id: Option<String>,
    /// Round number for display (1-based)
    pub round: u32,
    /// Total rounds for display
    pub total_rounds: u32,
}

/// Build the playback sequence for an exercise list.
///
/// Non-superset entries contribute `sets` consecutive steps. A contiguous
/// run of entries sharing a superset id contributes `max(sets)` rounds;
/// in round `r` every member with more than `r` sets contributes one
/// step, so a member with fewer sets than the group maximum simply drops
/// out of later rounds.
pub fn build_playback_sequence(exercises: &[WorkoutExercise]) -> Vec<PlaybackStep> {
    let mut steps = Vec::new();
    let mut i = 0;

    while i < exercises.len() {
        let entry = &exercises[i];

        match &entry.superset_id {
            Some(group_id) => {
                // Maximal contiguous run sharing this group key. Source
                // data guarantees contiguity; entries with the same key
                // elsewhere are treated as a separate group.
                let mut end = i + 1;
                while end < exercises.len()
                    && exercises[end].superset_id.as_deref() == Some(group_id.as_str())
                {
                    end += 1;
                }

                let max_sets = exercises[i..end].iter().map(|e| e.sets).max().unwrap_or(0);

                for round in 0..max_sets {
                    for (offset, member) in exercises[i..end].iter().enumerate() {
                        if round < member.sets {
                            steps.push(PlaybackStep {
                                exercise_index: i + offset,
                                set_index: round as usize,
                                superset_id: Some(group_id.clone()),
                                round: round + 1,
                                total_rounds: max_sets,
                            });
                        }
                    }
                }

                i = end;
            }
            None => {
                for set in 0..entry.sets {
                    steps.push(PlaybackStep {
                        exercise_index: i,
                        set_index: set as usize,
                        superset_id: None,
                        round: set + 1,
                        total_rounds: entry.sets,
                    });
                }
                i += 1;
            }
        }
    }

    steps
}

/// Validate that every superset group occupies one contiguous run.
///
/// The sequencer trusts contiguity, so the write boundary (workout store,
/// builder) enforces it instead of the playback path.
pub fn validate_superset_contiguity(exercises: &[WorkoutExercise]) -> Result<(), WorkoutError> {
    use std::collections::HashSet;

    let mut closed: HashSet<&str> = HashSet::new();
    let mut current: Option<&str> = None;

    for entry in exercises {
        match entry.superset_id.as_deref() {
            Some(group_id) => {
                if current != Some(group_id) {
                    if closed.contains(group_id) {
                        return Err(WorkoutError::NonContiguousSuperset(group_id.to_string()));
                    }
                    if let Some(prev) = current.take() {
                        closed.insert(prev);
                    }
                    current = Some(group_id);
                }
            }
            None => {
                if let Some(prev) = current.take() {
                    closed.insert(prev);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn plain(sets: u32) -> WorkoutExercise {
        WorkoutExercise::new(Uuid::new_v4(), sets, "10", 60)
    }

    fn grouped(sets: u32, group: &str) -> WorkoutExercise {
        WorkoutExercise::new(Uuid::new_v4(), sets, "10", 30).with_superset(group)
    }

    #[test]
    fn test_no_supersets_yields_sum_of_sets() {
        let exercises = vec![plain(3), plain(4), plain(2)];
        let steps = build_playback_sequence(&exercises);

        assert_eq!(steps.len(), 9);
        // Exercise-then-set order
        assert_eq!(steps[0].exercise_index, 0);
        assert_eq!(steps[2].set_index, 2);
        assert_eq!(steps[3].exercise_index, 1);
        assert_eq!(steps[8].exercise_index, 2);
    }

    #[test]
    fn test_superset_round_robin() {
        let exercises = vec![grouped(3, "a"), grouped(3, "a")];
        let steps = build_playback_sequence(&exercises);

        assert_eq!(steps.len(), 6);
        let order: Vec<usize> = steps.iter().map(|s| s.exercise_index).collect();
        assert_eq!(order, vec![0, 1, 0, 1, 0, 1]);
        assert!(steps.iter().all(|s| s.total_rounds == 3));
    }

    #[test]
    fn test_uneven_superset_member_drops_out() {
        // Group with sets [3, 3, 2]: 8 steps, third round omits the
        // two-set member.
        let exercises = vec![grouped(3, "a"), grouped(3, "a"), grouped(2, "a")];
        let steps = build_playback_sequence(&exercises);

        assert_eq!(steps.len(), 8);
        let round3: Vec<usize> = steps
            .iter()
            .filter(|s| s.round == 3)
            .map(|s| s.exercise_index)
            .collect();
        assert_eq!(round3, vec![0, 1]);
    }

    #[test]
    fn test_superset_followed_by_plain_exercise() {
        let exercises = vec![grouped(2, "a"), grouped(2, "a"), plain(3)];
        let steps = build_playback_sequence(&exercises);

        assert_eq!(steps.len(), 7);
        assert_eq!(steps[4].exercise_index, 2);
        assert!(steps[4].superset_id.is_none());
        assert_eq!(steps[4].round, 1);
        assert_eq!(steps[4].total_rounds, 3);
    }

    #[test]
    fn test_distinct_adjacent_groups() {
        let exercises = vec![grouped(2, "a"), grouped(2, "b")];
        let steps = build_playback_sequence(&exercises);

        // Two independent single-member groups, not one round-robin
        let order: Vec<usize> = steps.iter().map(|s| s.exercise_index).collect();
        assert_eq!(order, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_idempotent() {
        let exercises = vec![plain(2), grouped(3, "a"), grouped(2, "a"), plain(1)];
        let first = build_playback_sequence(&exercises);
        let second = build_playback_sequence(&exercises);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_list() {
        assert!(build_playback_sequence(&[]).is_empty());
    }

    #[test]
    fn test_contiguity_validation() {
        let ok = vec![grouped(2, "a"), grouped(2, "a"), plain(1), grouped(2, "b")];
        assert!(validate_superset_contiguity(&ok).is_ok());

        let split = vec![grouped(2, "a"), plain(1), grouped(2, "a")];
        assert!(matches!(
            validate_superset_contiguity(&split),
            Err(WorkoutError::NonContiguousSuperset(_))
        ));
    }
}
