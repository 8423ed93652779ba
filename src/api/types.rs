//! JIRA API request and response types.
//!
//! These types model the parts of the JIRA REST API v3 payloads that the
//! commands read or send.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Custom field holding the epic link on JIRA Cloud instances.
pub const EPIC_LINK_FIELD: &str = "customfield_10014";

/// A JIRA issue.
///
/// Returned by `GET /rest/api/3/issue/{issueKey}` or as part of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// The issue ID.
    #[serde(default)]
    pub id: String,
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    /// REST URL of the issue.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The issue fields.
    #[serde(default)]
    pub fields: IssueFields,
}

impl Issue {
    /// Get the issue summary.
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    /// Get the issue status name, if present.
    pub fn status(&self) -> Option<&str> {
        self.fields.status.as_ref().map(|s| s.name.as_str())
    }

    /// Get the assignee display name, if assigned.
    pub fn assignee(&self) -> Option<&str> {
        self.fields.assignee.as_ref().map(|a| a.display_name.as_str())
    }

    /// Get the description as flattened plain text.
    ///
    /// ADF descriptions are flattened with [`AtlassianDoc::flatten_blocks`];
    /// plain string descriptions are returned unchanged.
    pub fn description_text(&self) -> Option<String> {
        match self.fields.description.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => serde_json::from_value::<AtlassianDoc>(other.clone())
                .ok()
                .map(|doc| doc.flatten_blocks()),
        }
    }

    /// Get the epic link value, if set.
    pub fn epic_link(&self) -> Option<&Value> {
        self.fields.epic_link.as_ref().filter(|v| !v.is_null())
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.fields.summary)
    }
}

/// Issue fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    /// The issue summary/title.
    #[serde(default)]
    pub summary: String,
    /// The issue description (usually Atlassian Document Format).
    #[serde(default)]
    pub description: Option<Value>,
    /// The issue status.
    #[serde(default)]
    pub status: Option<Status>,
    /// The issue assignee.
    #[serde(default)]
    pub assignee: Option<User>,
    /// The epic this issue belongs to.
    #[serde(default, rename = "customfield_10014")]
    pub epic_link: Option<Value>,
    /// Sub-task references.
    #[serde(default)]
    pub subtasks: Vec<SubtaskRef>,
}

/// Issue status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    /// The status name (e.g., "To Do", "In Progress", "Done").
    pub name: String,
}

/// A JIRA user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's account ID.
    #[serde(default)]
    pub account_id: Option<String>,
    /// The user's display name.
    pub display_name: String,
}

/// A sub-task as embedded in its parent issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtaskRef {
    /// The sub-task key.
    pub key: String,
    /// The subset of fields JIRA embeds for sub-tasks.
    #[serde(default)]
    pub fields: SubtaskFields,
}

/// Fields JIRA embeds in a sub-task reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubtaskFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Option<Status>,
}

/// Search results from a JQL query.
///
/// Returned by `GET /rest/api/3/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The index of the first issue returned.
    #[serde(default)]
    pub start_at: u32,
    /// The maximum number of results requested.
    #[serde(default)]
    pub max_results: u32,
    /// The total number of matching issues.
    #[serde(default)]
    pub total: u32,
    /// The issues in this page.
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Fields for a new issue.
///
/// Optional values are omitted from the request when `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewIssue {
    pub project_key: String,
    pub summary: String,
    pub issue_type: String,
    pub description: Option<String>,
    /// Account ID of the assignee.
    pub assignee: Option<String>,
    pub priority: Option<String>,
    /// Key of the epic to link.
    pub epic_link: Option<String>,
    /// Key of the parent issue (for sub-tasks).
    pub parent_key: Option<String>,
}

impl NewIssue {
    /// Build the `POST /rest/api/3/issue` request body.
    pub fn to_request(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("project".into(), json!({ "key": self.project_key }));
        fields.insert("summary".into(), json!(self.summary));
        fields.insert("issuetype".into(), json!({ "name": self.issue_type }));

        if let Some(description) = &self.description {
            fields.insert(
                "description".into(),
                json!(AtlassianDoc::from_plain_text(description)),
            );
        }
        if let Some(assignee) = &self.assignee {
            fields.insert("assignee".into(), json!({ "accountId": assignee }));
        }
        if let Some(priority) = &self.priority {
            fields.insert("priority".into(), json!({ "name": priority }));
        }
        if let Some(epic) = &self.epic_link {
            fields.insert(EPIC_LINK_FIELD.into(), json!(epic));
        }
        if let Some(parent) = &self.parent_key {
            fields.insert("parent".into(), json!({ "key": parent }));
        }

        json!({ "fields": fields })
    }
}

/// Response to a successful issue creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

/// A worklog entry to add to an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogEntry {
    /// Time spent in JIRA duration notation (e.g., "2h 30m").
    pub time_spent: String,
    pub comment: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorklogBody<'a> {
    time_spent: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<AtlassianDoc>,
}

impl Serialize for WorklogEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WorklogBody {
            time_spent: &self.time_spent,
            comment: self.comment.as_deref().map(AtlassianDoc::from_plain_text),
        }
        .serialize(serializer)
    }
}

/// Atlassian Document Format (ADF) content.
///
/// JIRA uses ADF for rich text fields like descriptions and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlassianDoc {
    /// The document type (always "doc" for root documents).
    #[serde(rename = "type")]
    pub doc_type: String,
    /// The document version (typically 1).
    #[serde(default)]
    pub version: Option<u32>,
    /// The top-level content blocks.
    #[serde(default)]
    pub content: Vec<Value>,
}

impl AtlassianDoc {
    /// Wrap plain text in a document, one paragraph per line.
    pub fn from_plain_text(text: &str) -> Self {
        let content = text
            .lines()
            .map(|line| {
                if line.is_empty() {
                    json!({ "type": "paragraph", "content": [] })
                } else {
                    json!({
                        "type": "paragraph",
                        "content": [{ "type": "text", "text": line }]
                    })
                }
            })
            .collect();

        Self {
            content,
            ..Self::default()
        }
    }

    /// Flatten the document to text.
    ///
    /// The text nodes of each block are joined with a single space and the
    /// blocks are joined with a newline. Nodes without text are skipped.
    pub fn flatten_blocks(&self) -> String {
        self.content
            .iter()
            .map(|block| {
                block
                    .get("content")
                    .and_then(Value::as_array)
                    .map(|nodes| {
                        nodes
                            .iter()
                            .filter_map(|node| node.get("text").and_then(Value::as_str))
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for AtlassianDoc {
    fn default() -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: Some(1),
            content: vec![],
        }
    }
}
