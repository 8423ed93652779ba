//! Command error types.

use thiserror::Error;

use super::registry::CommandName;
use crate::api::error::ApiError;

/// Errors that end a command run.
///
/// Each of these is reported to the caller as `{"error": true, "message": ...}`.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required inputs were absent or empty. Raised before any request is sent.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The input object does not fit the command's input record.
    #[error("Invalid input for {command}: {reason}")]
    InvalidInput { command: CommandName, reason: String },

    /// No command is registered under this name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The JIRA API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
