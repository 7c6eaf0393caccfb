//! Coaching API client.
//!
//! Thin HTTP client for the cloud coaching service. Only the exercise
//! substitution endpoint is wired up; everything that consumes it goes
//! through the session flow, which treats the client as optional and
//! degrades to manual swaps when it is unconfigured or unreachable.

use std::time::Duration;

use serde::Serialize;

use crate::storage::config::GenerationSettings;

use super::types::{AiError, SubstituteCandidate};

/// Coaching API client.
pub struct CoachApiClient {
    /// HTTP client
    http: reqwest::Client,
    /// Base URL for the API
    base_url: String,
    /// API key for authentication
    api_key: String,
}

/// Substitution request payload.
#[derive(Debug, Serialize)]
struct SubstituteRequest<'a> {
    exercise_name: &'a str,
    muscle_group: &'a str,
    /// Free-text constraint, e.g. "no barbell available"
    constraint: Option<&'a str>,
}

impl CoachApiClient {
    /// Build a client from the configured generation settings.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self, AiError> {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            u64::from(settings.timeout_secs),
        )
    }

    /// Create a new coaching API client.
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Whether an API key is configured at all.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Ask the API for substitutes for an exercise.
    ///
    /// `constraint` narrows the suggestions ("shoulder pain", "no
    /// cable machine"). An empty candidate list from the API is an
    /// error; the caller always needs at least one option to present.
    pub async fn exercise_substitutes(
        &self,
        exercise_name: &str,
        muscle_group: &str,
        constraint: Option<&str>,
    ) -> Result<Vec<SubstituteCandidate>, AiError> {
        if !self.is_configured() {
            return Err(AiError::MissingApiKey);
        }

        let request = SubstituteRequest {
            exercise_name,
            muscle_group,
            constraint,
        };

        let candidates: Vec<SubstituteCandidate> =
            self.post("/exercises/substitutes", &request).await?;

        if candidates.is_empty() {
            return Err(AiError::InvalidResponse(
                "API returned no substitute candidates".to_string(),
            ));
        }

        tracing::debug!(
            "Received {} substitutes for '{}'",
            candidates.len(),
            exercise_name
        );
        Ok(candidates)
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R, AiError>
    where
        T: Serialize,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let api_response: ApiResponse<R> = response
                .json()
                .await
                .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

            if api_response.success {
                api_response.data.ok_or_else(|| {
                    AiError::InvalidResponse("API returned success but no data".to_string())
                })
            } else {
                let error = api_response.error.unwrap_or_default();
                Err(AiError::ApiError(error.message))
            }
        } else if status.as_u16() == 429 {
            Err(AiError::QuotaExceeded)
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(AiError::MissingApiKey)
        } else {
            Err(AiError::ApiError(format!("API returned status {}", status)))
        }
    }
}

/// API response wrapper.
#[derive(Debug, serde::Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<ApiErrorBody>,
}

/// API error details.
#[derive(Debug, Default, serde::Deserialize)]
#[allow(dead_code)]
struct ApiErrorBody {
    code: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: &str) -> CoachApiClient {
        CoachApiClient::new(
            "https://api.example.test/v1".to_string(),
            api_key.to_string(),
            5,
        )
        .unwrap()
    }

    #[test]
    fn test_configured_flag() {
        assert!(!client("").is_configured());
        assert!(client("key").is_configured());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let client = client("");
        let result = client
            .exercise_substitutes("Bench Press", "chest", None)
            .await;
        assert!(matches!(result, Err(AiError::MissingApiKey)));
    }
}
