//! Command dispatch.
//!
//! [`CommandRunner`] turns a command name and JSON input into a
//! [`CommandOutput`]. Inputs are validated before any request is sent, and
//! every failure is converted into an error report at this boundary.

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::error::CommandError;
use super::input::{
    BatchCreateIssuesInput, CommandInput, CreateIssueInput, IssueRefInput, ListTasksInput,
    LogWorkInput, TaskRefInput, TransitionIssueInput, UpdateTaskInput, DEFAULT_TASK_TYPE,
};
use super::output::{
    Ack, BatchItemOutcome, CommandOutput, CommandResponse, CommandResult, CreatedIssueLink,
    IssueDetails, TaskList, TaskSummary,
};
use super::registry::CommandName;
use crate::api::JiraClient;

/// Executes commands against a JIRA instance.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    client: JiraClient,
}

impl CommandRunner {
    pub fn new(client: JiraClient) -> Self {
        Self { client }
    }

    /// Run a command by wire name.
    ///
    /// Never fails: unknown names, invalid input and API failures all come
    /// back as an error report.
    #[instrument(skip(self, input))]
    pub async fn run(&self, name: &str, input: Value) -> CommandOutput {
        let result = match name.parse::<CommandName>() {
            Ok(command) => match CommandInput::parse(command, input) {
                Ok(parsed) => self.execute(parsed).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!("Command failed: {}", e);
        }
        CommandOutput::from(result)
    }

    /// Execute a parsed command.
    pub async fn execute(&self, input: CommandInput) -> CommandResult {
        debug!(command = %input.name(), "Executing command");

        match input {
            CommandInput::GetIssueDetails(input) => self.get_issue_details(input).await,
            CommandInput::CreateIssue(input) => self.create_issue(input).await,
            CommandInput::TransitionIssue(input) => Ok(self.transition_issue(input)),
            CommandInput::BatchCreateIssues(input) => self.batch_create_issues(input).await,
            CommandInput::LogWork(input) => self.log_work(input).await,
            CommandInput::CreateTask(input) => {
                self.create_issue(input.with_default_type(DEFAULT_TASK_TYPE))
                    .await
            }
            CommandInput::GetTask(input) => {
                let task_id = input.validate()?;
                self.get_issue_details(IssueRefInput {
                    issue_id_or_key: Some(task_id),
                })
                .await
            }
            CommandInput::UpdateTask(input) => self.update_task(input).await,
            CommandInput::DeleteTask(input) => self.delete_task(input).await,
            CommandInput::ListTasks(input) => self.list_tasks(input).await,
        }
    }

    async fn get_issue_details(&self, input: IssueRefInput) -> CommandResult {
        let key = input.validate()?;
        let issue = self.client.get_issue(&key).await?;
        Ok(CommandResponse::Issue(IssueDetails::from(&issue)))
    }

    async fn create_issue(&self, input: CreateIssueInput) -> CommandResult {
        let link = self.create(input).await?;
        Ok(CommandResponse::Created(link))
    }

    /// Validate and create one issue.
    async fn create(&self, input: CreateIssueInput) -> Result<CreatedIssueLink, CommandError> {
        let new_issue = input.validate()?;
        let created = self.client.create_issue(&new_issue).await?;
        Ok(CreatedIssueLink {
            url: self.client.browse_url(&created.key),
            key: created.key,
        })
    }

    /// Placeholder: reports success without calling JIRA.
    ///
    /// Inputs are not validated and the issue is left in its current status.
    // TODO: POST /rest/api/3/issue/{key}/transitions once callers rely on the status change.
    fn transition_issue(&self, input: TransitionIssueInput) -> CommandResponse {
        let key = input.issue_label();
        let transition_id = input.transition_label();
        warn!(issue_key = %key, %transition_id, "transitionIssue does not contact JIRA");

        CommandResponse::Ack(Ack::new(format!(
            "Issue {} transitioned using transition {}",
            key, transition_id
        )))
    }

    /// Create every item concurrently.
    ///
    /// Item failures are reported in place; outcomes follow input order.
    async fn batch_create_issues(&self, input: BatchCreateIssuesInput) -> CommandResult {
        let items = input.validate()?;
        info!(count = items.len(), "Creating issues in batch");

        let outcomes = join_all(items.into_iter().map(|item| async move {
            let summary = item.summary();
            let result = match item.into_input() {
                Ok(input) => self.create(input).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(link) => BatchItemOutcome::created(link),
                Err(e) => {
                    warn!(summary = ?summary, "Batch item failed: {}", e);
                    BatchItemOutcome::failed(summary, e.to_string())
                }
            }
        }))
        .await;

        let failed = outcomes.iter().filter(|o| o.is_error()).count();
        info!(created = outcomes.len() - failed, failed, "Batch finished");
        Ok(CommandResponse::Batch(outcomes))
    }

    async fn log_work(&self, input: LogWorkInput) -> CommandResult {
        let (issue_key, entry) = input.validate()?;
        self.client.add_worklog(&issue_key, &entry).await?;
        Ok(CommandResponse::Ack(Ack::new(format!(
            "Logged {} on {}",
            entry.time_spent, issue_key
        ))))
    }

    async fn update_task(&self, input: UpdateTaskInput) -> CommandResult {
        let (task_id, fields) = input.validate()?;
        self.client.update_issue(&task_id, &fields).await?;
        Ok(CommandResponse::Ack(Ack::new(format!("Task {} updated", task_id))))
    }

    async fn delete_task(&self, input: TaskRefInput) -> CommandResult {
        let task_id = input.validate()?;
        self.client.delete_issue(&task_id).await?;
        Ok(CommandResponse::Ack(Ack::new(format!("Task {} deleted", task_id))))
    }

    async fn list_tasks(&self, input: ListTasksInput) -> CommandResult {
        let (jql, max_results) = input.validate()?;
        let result = self.client.search_issues(&jql, max_results).await?;
        Ok(CommandResponse::Tasks(TaskList {
            total: result.total,
            tasks: result.issues.iter().map(TaskSummary::from).collect(),
        }))
    }
}
