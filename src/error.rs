//! Centralized error types.
//!
//! `AppError` aggregates the configuration and API errors so that code
//! wiring a client from a profile can use a single `?`.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::api::TransportFault;
use crate::config::ConfigError;

/// The crate-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl AppError {
    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::ProfileNotFound(name) => format!("Profile '{}' not found.", name),
            },
            AppError::Api(e) => match e {
                ApiError::Transport(fault) if fault.is_auth_fault() => {
                    "Authentication failed. Please check your username and password.".to_string()
                }
                ApiError::Transport(TransportFault::Network(_)) => {
                    "Connection failed. Please check your network and the JIRA URL.".to_string()
                }
                ApiError::Transport(TransportFault::Remote { message, .. }) => {
                    format!("JIRA rejected the request: {}", message)
                }
                ApiError::Transport(_) | ApiError::Decode { .. } => {
                    "Unexpected response from JIRA. Is the RPC plugin enabled?".to_string()
                }
                ApiError::Encode(_) => "Could not encode the request. Internal error.".to_string(),
                ApiError::InvalidUrl(_) => "Invalid JIRA endpoint in configuration.".to_string(),
                ApiError::Keyring(_) => {
                    "Could not read the password from secure storage.".to_string()
                }
            },
        }
    }

    /// Check if this error requires fixing configuration or credentials.
    pub fn is_critical(&self) -> bool {
        match self {
            AppError::Config(_) => true,
            AppError::Api(e) => {
                e.is_auth_fault() || matches!(e, ApiError::InvalidUrl(_) | ApiError::Keyring(_))
            }
        }
    }
}

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, AppError>;
