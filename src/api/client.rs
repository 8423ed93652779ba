//! JIRA API client implementation.
//!
//! This module provides the main client for the JIRA REST API v3.
//! It handles authentication, request building and error translation.
//! Requests are sent once; nothing is retried.

use std::time::Duration;

use reqwest::{header, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::types::{CreatedIssue, Issue, NewIssue, SearchResult, WorklogEntry};
use crate::config::{Config, DEFAULT_TIMEOUT_SECS};

/// Path prefix of the REST API v3.
const API_PREFIX: &str = "/rest/api/3";

/// The JIRA API client.
///
/// Provides async methods for the issue operations the commands rely on.
#[derive(Debug, Clone)]
pub struct JiraClient {
    /// The HTTP client.
    client: Client,
    /// The base URL for the JIRA instance.
    base_url: String,
    /// Authentication credentials.
    auth: Auth,
}

impl JiraClient {
    /// Create a new JIRA client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.profile.url))]
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating JIRA client");

        let auth = Auth::new(&config.profile.email, config.api_token());
        let client = Self::build_http_client(config.settings.timeout_secs)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.profile.url),
            auth,
        })
    }

    /// Create a new JIRA client with explicit credentials.
    ///
    /// Use this for testing or when credentials are provided directly.
    pub fn with_credentials(base_url: &str, email: &str, token: &str) -> Result<Self> {
        let auth = Auth::new(email, token);
        let client = Self::build_http_client(DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            auth,
        })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client(timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ApiError::Network)
    }

    /// Get a single issue by key.
    ///
    /// Calls `GET /rest/api/3/issue/{key}`.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        debug!("Fetching issue");

        let path = issue_path(key);
        let value = self.send::<()>(Method::GET, &path, None).await?;
        let issue: Issue = decode(value)?;

        debug!("Fetched issue: {}", issue.key);
        Ok(issue)
    }

    /// Create an issue.
    ///
    /// Calls `POST /rest/api/3/issue`.
    #[instrument(skip(self, issue), fields(project = %issue.project_key))]
    pub async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        debug!("Creating issue");

        let body = issue.to_request();
        let value = self.send(Method::POST, "/issue", Some(&body)).await?;
        let created: CreatedIssue = decode(value)?;

        info!(issue_key = %created.key, "Created issue");
        Ok(created)
    }

    /// Add a worklog entry to an issue.
    ///
    /// Calls `POST /rest/api/3/issue/{key}/worklog`. The response body is not
    /// interpreted, so an empty 2xx answer is a success.
    #[instrument(skip(self, entry), fields(issue_key = %key))]
    pub async fn add_worklog(&self, key: &str, entry: &WorklogEntry) -> Result<()> {
        debug!(time_spent = %entry.time_spent, "Adding worklog");

        let path = format!("{}/worklog", issue_path(key));
        self.send(Method::POST, &path, Some(entry)).await?;
        Ok(())
    }

    /// Update arbitrary fields on an issue.
    ///
    /// Calls `PUT /rest/api/3/issue/{key}` with `{"fields": fields}`.
    #[instrument(skip(self, fields), fields(issue_key = %key))]
    pub async fn update_issue(&self, key: &str, fields: &Map<String, Value>) -> Result<()> {
        debug!(field_count = fields.len(), "Updating issue");

        let path = issue_path(key);
        let body = serde_json::json!({ "fields": fields });
        self.send(Method::PUT, &path, Some(&body)).await?;
        Ok(())
    }

    /// Delete an issue.
    ///
    /// Calls `DELETE /rest/api/3/issue/{key}`.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn delete_issue(&self, key: &str) -> Result<()> {
        debug!("Deleting issue");

        let path = issue_path(key);
        self.send::<()>(Method::DELETE, &path, None).await?;
        Ok(())
    }

    /// Search for issues using JQL.
    ///
    /// `max_results` is only sent when given; JIRA applies its own default otherwise.
    #[instrument(skip(self), fields(jql = %jql))]
    pub async fn search_issues(&self, jql: &str, max_results: Option<u32>) -> Result<SearchResult> {
        let mut path = format!("/search?jql={}", urlencoding::encode(jql));
        if let Some(max) = max_results {
            path.push_str(&format!("&maxResults={}", max));
        }

        let value = self.send::<()>(Method::GET, &path, None).await?;
        let result: SearchResult = decode(value)?;
        debug!("Found {} issues (total: {})", result.issues.len(), result.total);
        Ok(result)
    }

    /// Perform a request with authentication and error handling.
    ///
    /// A body is attached, with a JSON content type, only when it serializes to
    /// JSON text. A body that fails to serialize is dropped and the request is
    /// sent without one.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        debug!(%method, %url, "Sending request");

        let mut request = self
            .client
            .request(method, &url)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            match serde_json::to_string(body) {
                Ok(text) => {
                    request = request
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(text);
                }
                Err(e) => warn!("Dropping request body that is not serializable: {}", e),
            }
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(%status, "Error response body: {}", text);
            return Err(ApiError::from_status(status, text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// The browser URL of an issue.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }
}

/// Issue resource path with the key percent-encoded as a single segment.
fn issue_path(key: &str) -> String {
    format!("/issue/{}", urlencoding::encode(key))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidResponse(format!("Unexpected response shape: {}", e)))
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for local testing)
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}
