//! Connection profile configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// A connection profile.
///
/// Profiles store where and as whom to connect. Passwords are stored
/// separately in the OS keychain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The name of this profile.
    ///
    /// Must be non-empty and unique across all profiles.
    pub name: String,

    /// The procedure catalog URL.
    ///
    /// e.g. "https://jira.example/rpc/json-rpc/jirasoapservice-v2".
    pub endpoint: String,

    /// The JIRA username to log in as.
    pub username: String,
}

impl Profile {
    /// Create a new profile.
    pub fn new(name: String, endpoint: String, username: String) -> Self {
        Self {
            name,
            endpoint,
            username,
        }
    }

    /// Validate this profile.
    ///
    /// Checks that:
    /// - The name is non-empty and has no whitespace
    /// - The endpoint is an http(s) URL
    /// - The username is non-empty
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "profile name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "profile name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if self.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': endpoint cannot be empty",
                self.name
            )));
        }

        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': endpoint must start with http:// or https://",
                self.name
            )));
        }

        if self.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': username cannot be empty",
                self.name
            )));
        }

        Ok(())
    }
}
