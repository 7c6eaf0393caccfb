//! Fuzzy exercise-name matching.
//!
//! One shared normalization + match routine for every de-duplication
//! site: substitution reuse, external-database merge, manual entry. Case
//! and punctuation insensitive, exact match first, then substring either
//! way ("barbell bench press" matches "Bench Press (Barbell)").

use super::types::Exercise;

/// Normalize a name for comparison: lowercase, alphanumerics only.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether two exercise names refer to the same exercise.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = normalize_name(a);
    let b = normalize_name(b);

    if a.is_empty() || b.is_empty() {
        return false;
    }

    a == b || a.contains(&b) || b.contains(&a)
}

/// Find a library exercise matching the given name, exact matches first.
pub fn find_match<'a>(name: &str, library: &'a [Exercise]) -> Option<&'a Exercise> {
    let target = normalize_name(name);
    if target.is_empty() {
        return None;
    }

    library
        .iter()
        .find(|e| normalize_name(&e.name) == target)
        .or_else(|| library.iter().find(|e| names_match(&e.name, name)))
}
