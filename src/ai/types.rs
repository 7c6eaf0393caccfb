//! Coaching AI types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One substitute exercise suggested by the coaching API.
///
/// Candidates are names, not library ids; the session flow matches
/// them against the local library before applying a swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstituteCandidate {
    /// Suggested exercise name
    pub name: String,
    /// Why this substitute fits (equipment, pattern, load)
    pub reason: String,
    /// Movement category the API classified the substitute under
    pub exercise_type: String,
}

/// Coaching API errors.
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key configured, or the key was rejected
    #[error("Coaching API key missing or rejected")]
    MissingApiKey,

    /// The API's usage quota is exhausted
    #[error("Coaching API quota exceeded")]
    QuotaExceeded,

    /// The API answered with an error
    #[error("Coaching API error: {0}")]
    ApiError(String),

    /// The API answered, but not with anything usable
    #[error("Invalid coaching API response: {0}")]
    InvalidResponse(String),

    /// Transport failure
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Payload serialization failed
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
