//! JIRA connection profile.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Connection details for a JIRA instance.
///
/// The API token is kept out of the profile so it can be serialized and logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The JIRA instance URL (e.g., "https://company.atlassian.net").
    pub url: String,

    /// The account identifier, normally an email address.
    pub email: String,
}

impl Profile {
    /// Create a new profile.
    pub fn new(url: String, email: String) -> Self {
        Self { url, email }
    }

    /// Validate this profile.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::ValidationError("URL cannot be empty".to_string()));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "URL '{}' must start with http:// or https://",
                self.url
            )));
        }

        if self.email.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "email cannot be empty".to_string(),
            ));
        }

        if self.email.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "account '{}' cannot contain whitespace",
                self.email
            )));
        }

        Ok(())
    }
}
