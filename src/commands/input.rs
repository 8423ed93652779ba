//! Typed command inputs.
//!
//! Every command receives a flat JSON object. It is deserialized into the
//! command's input record, then checked against the command's required-field
//! list. Empty strings count as missing.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::CommandError;
use super::registry::CommandName;
use crate::api::{NewIssue, WorklogEntry};

type Result<T> = std::result::Result<T, CommandError>;

/// Issue type used by `createTask` when none is given.
pub const DEFAULT_TASK_TYPE: &str = "Task";

/// A parsed command invocation.
#[derive(Debug, Clone)]
pub enum CommandInput {
    GetIssueDetails(IssueRefInput),
    CreateIssue(CreateIssueInput),
    TransitionIssue(TransitionIssueInput),
    BatchCreateIssues(BatchCreateIssuesInput),
    LogWork(LogWorkInput),
    CreateTask(CreateIssueInput),
    GetTask(TaskRefInput),
    UpdateTask(UpdateTaskInput),
    DeleteTask(TaskRefInput),
    ListTasks(ListTasksInput),
}

impl CommandInput {
    /// Deserialize `input` into the record for `name`.
    ///
    /// `null` is treated as an empty object. Validation of required fields
    /// happens later, in the handler. `transitionIssue` accepts any input.
    pub fn parse(name: CommandName, input: Value) -> Result<Self> {
        if name == CommandName::TransitionIssue {
            return Ok(Self::TransitionIssue(TransitionIssueInput::from_value(input)));
        }

        let input = match input {
            Value::Null => Value::Object(Map::new()),
            Value::Object(_) => input,
            _ => {
                return Err(CommandError::InvalidInput {
                    command: name,
                    reason: "expected a JSON object".to_string(),
                })
            }
        };

        let invalid = |e: serde_json::Error| CommandError::InvalidInput {
            command: name,
            reason: e.to_string(),
        };

        let parsed = match name {
            CommandName::GetIssueDetails => {
                Self::GetIssueDetails(serde_json::from_value(input).map_err(invalid)?)
            }
            CommandName::CreateIssue => {
                Self::CreateIssue(serde_json::from_value(input).map_err(invalid)?)
            }
            CommandName::TransitionIssue => {
                Self::TransitionIssue(TransitionIssueInput::from_value(input))
            }
            CommandName::BatchCreateIssues => {
                Self::BatchCreateIssues(serde_json::from_value(input).map_err(invalid)?)
            }
            CommandName::LogWork => Self::LogWork(serde_json::from_value(input).map_err(invalid)?),
            CommandName::CreateTask => {
                Self::CreateTask(serde_json::from_value(input).map_err(invalid)?)
            }
            CommandName::GetTask => Self::GetTask(serde_json::from_value(input).map_err(invalid)?),
            CommandName::UpdateTask => {
                Self::UpdateTask(serde_json::from_value(input).map_err(invalid)?)
            }
            CommandName::DeleteTask => {
                Self::DeleteTask(serde_json::from_value(input).map_err(invalid)?)
            }
            CommandName::ListTasks => {
                Self::ListTasks(serde_json::from_value(input).map_err(invalid)?)
            }
        };
        Ok(parsed)
    }

    /// The command this input belongs to.
    pub fn name(&self) -> CommandName {
        match self {
            Self::GetIssueDetails(_) => CommandName::GetIssueDetails,
            Self::CreateIssue(_) => CommandName::CreateIssue,
            Self::TransitionIssue(_) => CommandName::TransitionIssue,
            Self::BatchCreateIssues(_) => CommandName::BatchCreateIssues,
            Self::LogWork(_) => CommandName::LogWork,
            Self::CreateTask(_) => CommandName::CreateTask,
            Self::GetTask(_) => CommandName::GetTask,
            Self::UpdateTask(_) => CommandName::UpdateTask,
            Self::DeleteTask(_) => CommandName::DeleteTask,
            Self::ListTasks(_) => CommandName::ListTasks,
        }
    }
}

/// Collects the names of missing required fields.
#[derive(Debug, Default)]
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    /// Take a required text value, recording `name` if it is absent or blank.
    fn text(&mut self, name: &'static str, value: Option<String>) -> String {
        match present(value) {
            Some(v) => v,
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    fn check(&mut self, name: &'static str, ok: bool) {
        if !ok {
            self.missing.push(name);
        }
    }

    fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(CommandError::MissingFields(self.missing))
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accept identifiers given either as JSON strings or numbers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

/// Input of `getIssueDetails`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRefInput {
    #[serde(default, deserialize_with = "id_string")]
    pub issue_id_or_key: Option<String>,
}

impl IssueRefInput {
    pub fn validate(self) -> Result<String> {
        let mut required = Required::default();
        let key = required.text("issueIdOrKey", self.issue_id_or_key);
        required.finish()?;
        Ok(key)
    }
}

/// Input of `createIssue`, `createTask` and each `batchCreateIssues` item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueInput {
    pub project_key: Option<String>,
    pub summary: Option<String>,
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<String>,
    pub epic_link: Option<String>,
    pub parent_key: Option<String>,
}

impl CreateIssueInput {
    /// Check the required fields and build the issue to create.
    pub fn validate(self) -> Result<NewIssue> {
        let mut required = Required::default();
        let project_key = required.text("projectKey", self.project_key);
        let summary = required.text("summary", self.summary);
        let issue_type = required.text("issueType", self.issue_type);
        required.finish()?;

        Ok(NewIssue {
            project_key,
            summary,
            issue_type,
            description: present(self.description),
            assignee: present(self.assignee),
            priority: present(self.priority),
            epic_link: present(self.epic_link),
            parent_key: present(self.parent_key),
        })
    }

    /// Fill in the issue type when the caller left it out.
    pub fn with_default_type(mut self, issue_type: &str) -> Self {
        if present(self.issue_type.clone()).is_none() {
            self.issue_type = Some(issue_type.to_string());
        }
        self
    }
}

/// Input of `transitionIssue`.
///
/// Values are kept exactly as given; nothing is checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionIssueInput {
    #[serde(default)]
    pub issue_id_or_key: Option<Value>,
    #[serde(default)]
    pub transition_id: Option<Value>,
}

impl TransitionIssueInput {
    /// Read the identifiers from any JSON value. Non-objects carry none.
    pub fn from_value(input: Value) -> Self {
        match input {
            Value::Object(_) => serde_json::from_value(input).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// The issue as text: strings unquoted, other values as JSON.
    pub fn issue_label(&self) -> String {
        label(self.issue_id_or_key.as_ref())
    }

    pub fn transition_label(&self) -> String {
        label(self.transition_id.as_ref())
    }
}

fn label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Input of `batchCreateIssues`.
///
/// Items stay raw JSON here so a malformed item fails on its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateIssuesInput {
    pub project_key: Option<String>,
    pub issues: Option<Vec<Value>>,
}

impl BatchCreateIssuesInput {
    /// Check the batch-level fields.
    ///
    /// Returns the items with the batch project applied to those that name none.
    /// Item fields are checked per item when it is created.
    pub fn validate(self) -> Result<Vec<BatchItem>> {
        let mut required = Required::default();
        let project_key = required.text("projectKey", self.project_key);
        let issues = self.issues.unwrap_or_default();
        required.check("issues", !issues.is_empty());
        required.finish()?;

        Ok(issues
            .into_iter()
            .map(|mut item| {
                if let Value::Object(fields) = &mut item {
                    let unset = match fields.get("projectKey") {
                        None | Some(Value::Null) => true,
                        Some(Value::String(s)) => s.trim().is_empty(),
                        Some(_) => false,
                    };
                    if unset {
                        fields.insert("projectKey".to_string(), Value::String(project_key.clone()));
                    }
                }
                BatchItem(item)
            })
            .collect())
    }
}

/// One `batchCreateIssues` item, not yet read into a [`CreateIssueInput`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem(Value);

impl BatchItem {
    /// The item's summary, if it has a textual one.
    pub fn summary(&self) -> Option<String> {
        self.0.get("summary").and_then(Value::as_str).map(str::to_string)
    }

    /// Read the item as `createIssue` input.
    pub fn into_input(self) -> Result<CreateIssueInput> {
        let invalid = |reason: String| CommandError::InvalidInput {
            command: CommandName::BatchCreateIssues,
            reason,
        };
        if !self.0.is_object() {
            return Err(invalid("expected each issue to be a JSON object".to_string()));
        }
        serde_json::from_value(self.0).map_err(|e| invalid(e.to_string()))
    }
}

/// Input of `logWork`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogWorkInput {
    #[serde(default, deserialize_with = "id_string")]
    pub issue_key: Option<String>,
    pub time_spent: Option<String>,
    pub comment: Option<String>,
}

impl LogWorkInput {
    pub fn validate(self) -> Result<(String, WorklogEntry)> {
        let mut required = Required::default();
        let issue_key = required.text("issueKey", self.issue_key);
        let time_spent = required.text("timeSpent", self.time_spent);
        required.finish()?;

        Ok((
            issue_key,
            WorklogEntry {
                time_spent,
                comment: present(self.comment),
            },
        ))
    }
}

/// Input of `getTask` and `deleteTask`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRefInput {
    #[serde(default, deserialize_with = "id_string")]
    pub task_id: Option<String>,
}

impl TaskRefInput {
    pub fn validate(self) -> Result<String> {
        let mut required = Required::default();
        let task_id = required.text("taskId", self.task_id);
        required.finish()?;
        Ok(task_id)
    }
}

/// Input of `updateTask`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    #[serde(default, deserialize_with = "id_string")]
    pub task_id: Option<String>,
    pub fields: Option<Map<String, Value>>,
}

impl UpdateTaskInput {
    pub fn validate(self) -> Result<(String, Map<String, Value>)> {
        let mut required = Required::default();
        let task_id = required.text("taskId", self.task_id);
        let fields = self.fields.unwrap_or_default();
        required.check("fields", !fields.is_empty());
        required.finish()?;
        Ok((task_id, fields))
    }
}

/// Input of `listTasks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksInput {
    pub jql: Option<String>,
    pub max_results: Option<u32>,
}

impl ListTasksInput {
    pub fn validate(self) -> Result<(String, Option<u32>)> {
        let mut required = Required::default();
        let jql = required.text("jql", self.jql);
        required.finish()?;
        Ok((jql, self.max_results))
    }
}
