//! Credentials and session tokens.
//!
//! Passwords can be supplied directly or read from the OS keyring. Neither the
//! password nor the session token ever shows up in `Debug` output.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{ApiError, Result};

/// The keyring service name for stored passwords.
const KEYRING_SERVICE: &str = "jira-rpc";

/// Login credentials for the remote service.
///
/// Consumed by the login exchange; the client keeps only the resulting token.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create credentials with the password stored in the OS keyring.
    ///
    /// The keyring entry is keyed by profile name, not by username, so two
    /// profiles for the same user on different servers stay separate.
    ///
    /// # Errors
    ///
    /// Returns an error if the password cannot be retrieved from the keyring.
    pub fn from_keyring(profile_name: &str, username: &str) -> Result<Self> {
        let password = get_password(profile_name)?;
        Ok(Self::new(username, password))
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Split into the positional login arguments.
    pub(crate) fn into_login_args(self) -> [String; 2] {
        [self.username, self.password]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An opaque session token issued by a successful login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token to send over the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Retrieve a password from the OS keyring.
///
/// # Errors
///
/// Returns an error if the password cannot be retrieved from the keyring.
pub fn get_password(profile_name: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve password: {}", e)))
}

/// Check if a password exists in the OS keyring for a profile.
pub fn has_password(profile_name: &str) -> bool {
    get_password(profile_name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_new() {
        let creds = Credentials::new("alice", "secret");
        assert_eq!(creds.username(), "alice");
    }

    #[test]
    fn test_credentials_login_args_order() {
        let creds = Credentials::new("alice", "secret");
        assert_eq!(creds.into_login_args(), ["alice".to_string(), "secret".to_string()]);
    }

    #[test]
    fn test_credentials_do_not_expose_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug_output = format!("{:?}", creds);

        assert!(debug_output.contains("alice"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_session_token_does_not_expose_value() {
        let token = SessionToken::new("ABC123");
        let debug_output = format!("{:?}", token);

        assert!(!debug_output.contains("ABC123"));
        assert_eq!(token.as_str(), "ABC123");
    }

    #[test]
    fn test_session_token_serializes_as_plain_string() {
        let token = SessionToken::new("ABC123");
        assert_eq!(serde_json::to_value(&token).unwrap(), serde_json::json!("ABC123"));

        let parsed: SessionToken = serde_json::from_str("\"XYZ\"").unwrap();
        assert_eq!(parsed.as_str(), "XYZ");
    }
}
