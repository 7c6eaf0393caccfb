//! Cloud coaching API integration.

pub mod client;
pub mod types;

pub use client::CoachApiClient;
pub use types::{AiError, SubstituteCandidate};
