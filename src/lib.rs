//! jirakit - command-style access to the JIRA REST API.
//!
//! Each command takes a flat JSON object, validates it, calls JIRA and returns
//! either a result payload or `{"error": true, "message": ...}`.
//!
//! ```no_run
//! use jirakit::api::JiraClient;
//! use jirakit::commands::CommandRunner;
//! use jirakit::config::Config;
//!
//! # async fn example() -> Result<(), jirakit::error::AppError> {
//! let config = Config::load(None)?;
//! let runner = CommandRunner::new(JiraClient::new(&config)?);
//! let output = runner
//!     .run("getIssueDetails", serde_json::json!({ "issueIdOrKey": "PROJ-123" }))
//!     .await;
//! println!("{}", output.to_json());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
