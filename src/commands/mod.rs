//! Command layer.
//!
//! This module provides:
//! - Command descriptors and the registry used for introspection
//! - Typed inputs with required-field validation
//! - The runner that dispatches commands to the JIRA client
//! - The success and error output shapes

pub mod error;
mod input;
mod output;
mod registry;
mod runner;

#[cfg(test)]
mod tests;

pub use error::CommandError;
pub use input::{
    BatchCreateIssuesInput, BatchItem, CommandInput, CreateIssueInput, IssueRefInput,
    ListTasksInput, LogWorkInput, TaskRefInput, TransitionIssueInput, UpdateTaskInput,
    DEFAULT_TASK_TYPE,
};
pub use output::{
    Ack, BatchItemOutcome, CommandOutput, CommandResponse, CommandResult, CreatedIssueLink,
    ErrorReport, IssueDetails, SubtaskSummary, TaskList, TaskSummary,
};
pub use registry::{CommandDescriptor, CommandName, CommandRegistry, ParamKind, ParamSpec};
pub use runner::CommandRunner;
