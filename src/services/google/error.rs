use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the events provider. Never retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Unexpected response from Google Calendar: {0}")]
    InvalidResponse(String),

    #[error("Invalid date range")]
    InvalidRange,
}

impl ProviderError {
    /// Build an API error from a non-success response body, preferring the
    /// JSON `error.message` when the body has one.
    pub(crate) fn from_response_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<super::types::ApiErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.error)
            .and_then(|detail| detail.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Google API error ({})", status.as_u16()));

        ProviderError::Api { status, message }
    }
}
