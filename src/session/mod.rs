//! Live session execution.

pub mod engine;
pub mod types;

pub use engine::SessionEngine;
pub use types::{RestTimer, SessionError, SessionStatus};
