//! Authentication handling for JIRA API.
//!
//! This module handles authentication with JIRA using Basic Auth
//! (email + API token) and optional token storage via the OS keyring.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::error::{ApiError, Result};

/// The keyring service name for jirakit tokens.
const KEYRING_SERVICE: &str = "jirakit";

/// Authentication credentials for JIRA.
#[derive(Debug, Clone)]
pub struct Auth {
    /// The account email address.
    email: String,
    /// The complete "Basic ..." authorization header value.
    auth_header: String,
}

impl Auth {
    /// Create new authentication credentials from email and token.
    ///
    /// The token is immediately encoded and the raw token is not stored.
    pub fn new(email: &str, token: &str) -> Self {
        let auth_header = build_auth_header(email, token);
        Self {
            email: email.to_string(),
            auth_header,
        }
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the email address.
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Build the Basic Auth header value.
///
/// Encodes "email:token" in Base64 and prepends "Basic ".
fn build_auth_header(email: &str, token: &str) -> String {
    let credentials = format!("{}:{}", email, token);
    let encoded = BASE64.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}

fn keyring_entry(email: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, email)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))
}

/// Store an API token in the OS keyring under the account email.
///
/// # Errors
///
/// Returns an error if the token cannot be stored in the keyring.
pub fn store_token(email: &str, token: &str) -> Result<()> {
    keyring_entry(email)?
        .set_password(token)
        .map_err(|e| ApiError::Keyring(format!("failed to store token: {}", e)))
}

/// Retrieve an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if no token is stored for `email` or the keyring is unavailable.
pub fn get_token(email: &str) -> Result<String> {
    keyring_entry(email)?
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

/// Delete an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be deleted from the keyring.
pub fn delete_token(email: &str) -> Result<()> {
    keyring_entry(email)?
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete token: {}", e)))
}

/// Check if a token exists in the OS keyring for an account.
pub fn has_token(email: &str) -> bool {
    get_token(email).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_header() {
        let header = build_auth_header("user@example.com", "api_token_here");
        assert!(header.starts_with("Basic "));

        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();
        assert_eq!(decoded_str, "user@example.com:api_token_here");
    }

    #[test]
    fn test_auth_new() {
        let auth = Auth::new("user@example.com", "secret_token");
        assert_eq!(auth.email(), "user@example.com");
        assert_eq!(
            auth.header_value(),
            "Basic dXNlckBleGFtcGxlLmNvbTpzZWNyZXRfdG9rZW4="
        );
    }

    #[test]
    fn test_auth_does_not_expose_token() {
        let auth = Auth::new("user@example.com", "secret_token");
        let debug_output = format!("{:?}", auth);

        assert!(!debug_output.contains("secret_token"));
    }
}
