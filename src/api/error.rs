//! API error types for the JIRA client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when interacting with the JIRA API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    ///
    /// Carries the status code and the raw response text unchanged.
    #[error("Jira API error {status}: {body}")]
    Http {
        /// The HTTP status returned by JIRA.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },

    /// Network or HTTP transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Keyring error when storing/retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// A success response whose body could not be interpreted.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code and the response text.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            body: body.into(),
        }
    }

    /// The HTTP status, if this error came from a JIRA response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether JIRA rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(StatusCode::UNAUTHORIZED))
    }

    /// Whether the requested resource does not exist (or is hidden).
    pub fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(StatusCode::NOT_FOUND))
    }

    /// Extract JIRA's own error messages from the response body.
    ///
    /// JIRA reports failures as `{"errorMessages": [...], "errors": {...}}`.
    /// Returns `None` when the body is not in that shape.
    pub fn jira_messages(&self) -> Option<String> {
        let ApiError::Http { body, .. } = self else {
            return None;
        };
        let json = serde_json::from_str::<serde_json::Value>(body).ok()?;

        let mut messages: Vec<String> = json
            .get("errorMessages")
            .and_then(|m| m.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if let Some(errors) = json.get("errors").and_then(|e| e.as_object()) {
            messages.extend(errors.iter().map(|(field, v)| match v.as_str() {
                Some(text) => format!("{}: {}", field, text),
                None => format!("{}: {}", field, v),
            }));
        }

        if messages.is_empty() {
            None
        } else {
            Some(messages.join(", "))
        }
    }
}
