//! Command result shapes.
//!
//! Successful runs produce a [`CommandResponse`]; failures are reported as an
//! [`ErrorReport`]. [`CommandOutput`] serializes to whichever applies, so callers
//! check for the `error` marker instead of catching failures.

use serde::Serialize;
use serde_json::Value;

use super::error::CommandError;
use crate::api::Issue;

/// Result of executing a command.
pub type CommandResult = Result<CommandResponse, CommandError>;

/// Projection of an issue returned by `getIssueDetails` and `getTask`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDetails {
    pub key: String,
    pub summary: String,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub description: Option<String>,
    pub epic_link: Option<Value>,
    pub subtasks: Vec<SubtaskSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtaskSummary {
    pub key: String,
    pub summary: String,
    pub status: Option<String>,
}

impl From<&Issue> for IssueDetails {
    fn from(issue: &Issue) -> Self {
        Self {
            key: issue.key.clone(),
            summary: issue.summary().to_string(),
            status: issue.status().map(str::to_string),
            assignee: issue.assignee().map(str::to_string),
            description: issue.description_text(),
            epic_link: issue.epic_link().cloned(),
            subtasks: issue
                .fields
                .subtasks
                .iter()
                .map(|st| SubtaskSummary {
                    key: st.key.clone(),
                    summary: st.fields.summary.clone(),
                    status: st.fields.status.as_ref().map(|s| s.name.clone()),
                })
                .collect(),
        }
    }
}

/// Key and browser URL of a created issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedIssueLink {
    pub key: String,
    pub url: String,
}

/// Acknowledgement of a command that has no data to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Outcome of one `batchCreateIssues` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BatchItemOutcome {
    Created {
        key: String,
        url: String,
        success: bool,
    },
    Failed {
        error: bool,
        summary: Option<String>,
        message: String,
    },
}

impl BatchItemOutcome {
    pub fn created(link: CreatedIssueLink) -> Self {
        Self::Created {
            key: link.key,
            url: link.url,
            success: true,
        }
    }

    pub fn failed(summary: Option<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            error: true,
            summary,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Row of a `listTasks` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub key: String,
    pub summary: String,
    pub status: Option<String>,
    pub assignee: Option<String>,
}

impl From<&Issue> for TaskSummary {
    fn from(issue: &Issue) -> Self {
        Self {
            key: issue.key.clone(),
            summary: issue.summary().to_string(),
            status: issue.status().map(str::to_string),
            assignee: issue.assignee().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskList {
    pub total: u32,
    pub tasks: Vec<TaskSummary>,
}

/// Success payload of a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandResponse {
    Issue(IssueDetails),
    Created(CreatedIssueLink),
    Ack(Ack),
    Batch(Vec<BatchItemOutcome>),
    Tasks(TaskList),
}

/// The `{"error": true, "message": ...}` failure shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: bool,
    pub message: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

/// What a caller receives from a command run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Success(CommandResponse),
    Error(ErrorReport),
}

impl CommandOutput {
    /// Whether the run failed as a whole.
    ///
    /// Failed items inside a batch do not count.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Render as a JSON value.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": true, "message": format!("failed to encode output: {}", e) })
        })
    }
}

impl From<CommandResult> for CommandOutput {
    fn from(result: CommandResult) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(e) => Self::Error(ErrorReport::new(e.to_string())),
        }
    }
}
