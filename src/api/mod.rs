//! JIRA API client and types.
//!
//! This module provides the interface for communicating with the JIRA REST API.

pub mod auth;
mod client;
pub mod error;
pub mod types;

pub use auth::{delete_token, get_token, has_token, store_token, Auth};
pub use client::JiraClient;
pub use error::ApiError;
pub use types::{
    AtlassianDoc, CreatedIssue, Issue, NewIssue, SearchResult, WorklogEntry,
    EPIC_LINK_FIELD,
};
