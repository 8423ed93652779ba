//! Centralized error types for jirakit.
//!
//! Errors that escape the command boundary (startup, CLI plumbing, keyring
//! management) are collected here with user-friendly messages.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (stdin, stdout).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input could not be parsed or output could not be encoded.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file exists and is readable.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::Missing(names) => {
                    format!("Missing configuration: {}", names.join(", "))
                }
            },
            AppError::Api(e) => match e {
                ApiError::Http { .. } if e.is_unauthorized() => {
                    "Authentication failed. Please check your email and API token.".to_string()
                }
                ApiError::Http { status, .. } => match e.jira_messages() {
                    Some(messages) => format!("JIRA returned {}: {}", status, messages),
                    None => e.to_string(),
                },
                ApiError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::Keyring(msg) => format!("Could not access secure storage: {}", msg),
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from JIRA. Please try again.".to_string()
                }
            },
            AppError::Io(_) => "An input/output operation failed.".to_string(),
            AppError::Json(e) => format!("Invalid JSON: {}", e),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error prevents any command from running.
    pub fn is_critical(&self) -> bool {
        matches!(self, AppError::Config(_)) || matches!(self, AppError::Api(e) if e.is_unauthorized())
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::Missing(_)) => Some(
                "Set JIRA_BASE_URL, JIRA_EMAIL and JIRA_API_TOKEN, or add them to the config file.",
            ),
            AppError::Config(ConfigError::ParseError(_)) => {
                Some("Fix the [profile] and [settings] tables in config.toml.")
            }
            AppError::Api(e) if e.is_unauthorized() => {
                Some("Check your API token at https://id.atlassian.com/manage-profile/security/api-tokens")
            }
            AppError::Api(ApiError::Network(_)) => {
                Some("Check your internet connection and JIRA URL.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
