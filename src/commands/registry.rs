//! Command registry.
//!
//! Provides the command descriptors (name, description and parameter schema)
//! used for introspection, plus relevance-ranked search over them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::CommandError;

/// The closed set of commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandName {
    GetIssueDetails,
    CreateIssue,
    TransitionIssue,
    BatchCreateIssues,
    LogWork,
    CreateTask,
    GetTask,
    UpdateTask,
    DeleteTask,
    ListTasks,
}

impl CommandName {
    /// Every command, in registry order.
    pub const ALL: [CommandName; 10] = [
        Self::GetIssueDetails,
        Self::CreateIssue,
        Self::TransitionIssue,
        Self::BatchCreateIssues,
        Self::LogWork,
        Self::CreateTask,
        Self::GetTask,
        Self::UpdateTask,
        Self::DeleteTask,
        Self::ListTasks,
    ];

    /// The wire name of this command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetIssueDetails => "getIssueDetails",
            Self::CreateIssue => "createIssue",
            Self::TransitionIssue => "transitionIssue",
            Self::BatchCreateIssues => "batchCreateIssues",
            Self::LogWork => "logWork",
            Self::CreateTask => "createTask",
            Self::GetTask => "getTask",
            Self::UpdateTask => "updateTask",
            Self::DeleteTask => "deleteTask",
            Self::ListTasks => "listTasks",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CommandError::UnknownCommand(s.to_string()))
    }
}

/// JSON type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Number,
    Array,
    Object,
}

/// One entry of a command's parameter schema.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

const fn param(
    name: &'static str,
    kind: ParamKind,
    required: bool,
    description: &'static str,
) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required,
        description,
    }
}

/// A command's name, description and parameter schema.
#[derive(Debug, Clone, Serialize)]
pub struct CommandDescriptor {
    pub name: CommandName,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl CommandDescriptor {
    /// Names of the required parameters.
    pub fn required_params(&self) -> Vec<&'static str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect()
    }
}

/// Optional issue fields shared by createIssue, createTask and batch items.
fn optional_issue_params() -> [ParamSpec; 5] {
    use ParamKind::String as Str;
    [
        param("description", Str, false, "Plain-text description"),
        param("assignee", Str, false, "Account ID of the assignee"),
        param("priority", Str, false, "Priority name (e.g. High)"),
        param("epicLink", Str, false, "Key of the epic to link the issue to"),
        param("parentKey", Str, false, "Key of the parent issue for sub-tasks"),
    ]
}

/// Registry of all available commands.
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    /// Create the registry with every command's descriptor.
    pub fn new() -> Self {
        use ParamKind::{Array, Number, Object, String as Str};

        let commands = vec![
            CommandDescriptor {
                name: CommandName::GetIssueDetails,
                description: "Get details of a JIRA issue",
                params: vec![param("issueIdOrKey", Str, true, "Issue ID or key (e.g. PROJ-123)")],
            },
            CommandDescriptor {
                name: CommandName::CreateIssue,
                description: "Create a new JIRA issue",
                params: [
                    param("projectKey", Str, true, "Project key (e.g. PROJ)"),
                    param("summary", Str, true, "Issue summary"),
                    param("issueType", Str, true, "Issue type name (e.g. Task, Bug)"),
                ]
                .into_iter()
                .chain(optional_issue_params())
                .collect(),
            },
            CommandDescriptor {
                name: CommandName::TransitionIssue,
                description: "Transition a JIRA issue to a new status",
                params: vec![
                    param("issueIdOrKey", Str, true, "Issue ID or key"),
                    param("transitionId", Str, true, "ID of the workflow transition"),
                ],
            },
            CommandDescriptor {
                name: CommandName::BatchCreateIssues,
                description: "Create several JIRA issues in one project concurrently",
                params: vec![
                    param("projectKey", Str, true, "Project key shared by every issue"),
                    param(
                        "issues",
                        Array,
                        true,
                        "Issues to create; each has summary, issueType and the optional createIssue fields",
                    ),
                ],
            },
            CommandDescriptor {
                name: CommandName::LogWork,
                description: "Log time spent on a JIRA issue",
                params: vec![
                    param("issueKey", Str, true, "Issue key"),
                    param("timeSpent", Str, true, "Time spent in JIRA notation (e.g. 2h 30m)"),
                    param("comment", Str, false, "Worklog comment"),
                ],
            },
            CommandDescriptor {
                name: CommandName::CreateTask,
                description: "Create a task",
                params: [
                    param("projectKey", Str, true, "Project key"),
                    param("summary", Str, true, "Task summary"),
                    param("issueType", Str, false, "Issue type name (defaults to Task)"),
                ]
                .into_iter()
                .chain(optional_issue_params())
                .collect(),
            },
            CommandDescriptor {
                name: CommandName::GetTask,
                description: "Get a task",
                params: vec![param("taskId", Str, true, "Task ID or key")],
            },
            CommandDescriptor {
                name: CommandName::UpdateTask,
                description: "Update fields on a task",
                params: vec![
                    param("taskId", Str, true, "Task ID or key"),
                    param("fields", Object, true, "JIRA field values to set"),
                ],
            },
            CommandDescriptor {
                name: CommandName::DeleteTask,
                description: "Delete a task",
                params: vec![param("taskId", Str, true, "Task ID or key")],
            },
            CommandDescriptor {
                name: CommandName::ListTasks,
                description: "List tasks matching a JQL query",
                params: vec![
                    param("jql", Str, true, "JQL query"),
                    param("maxResults", Number, false, "Maximum number of tasks to return"),
                ],
            },
        ];

        Self { commands }
    }

    /// Look up a command by wire name.
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name.as_str() == name)
    }

    /// Get all registered commands.
    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// Search for commands matching the query.
    ///
    /// Returns commands sorted by relevance score (highest first).
    /// An empty query returns every command in registry order.
    pub fn search(&self, query: &str) -> Vec<&CommandDescriptor> {
        if query.is_empty() {
            return self.commands.iter().collect();
        }

        let query_lower = query.to_lowercase();
        let mut results: Vec<(&CommandDescriptor, i32)> = self
            .commands
            .iter()
            .filter_map(|cmd| {
                let score = Self::match_score(cmd, &query_lower);
                (score > 0).then_some((cmd, score))
            })
            .collect();

        // Stable sort keeps registry order among equal scores
        results.sort_by(|a, b| b.1.cmp(&a.1));
        results.into_iter().map(|(cmd, _)| cmd).collect()
    }

    /// Calculate the match score for a command against a lowercased query.
    fn match_score(cmd: &CommandDescriptor, query: &str) -> i32 {
        let mut score = 0;

        let name_lower = cmd.name.as_str().to_lowercase();
        if name_lower.contains(query) {
            score += 100;
            if name_lower.starts_with(query) {
                score += 50;
            }
        }

        if cmd
            .params
            .iter()
            .any(|p| p.name.to_lowercase().contains(query))
        {
            score += 25;
        }

        if cmd.description.to_lowercase().contains(query) {
            score += 10;
        }

        score
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
