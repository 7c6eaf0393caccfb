//! Exercise definitions, library persistence, and name matching.

pub mod library;
pub mod matching;
pub mod types;

pub use library::{ExerciseLibrary, LibraryError, SearchCriteria};
pub use matching::{find_match, names_match};
pub use types::{Exercise, MuscleGroup};
