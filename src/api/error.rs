//! API error types for the RPC client.

use thiserror::Error;

use super::transport::TransportFault;

/// Errors that can occur when talking to the remote procedure catalog.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport failed: network, protocol or remote-side exception.
    #[error("{0}")]
    Transport(#[from] TransportFault),

    /// Arguments could not be turned into JSON.
    #[error("Failed to encode arguments: {0}")]
    Encode(#[source] serde_json::Error),

    /// The remote result did not have the expected shape.
    #[error("Unexpected result from {procedure}: {source}")]
    Decode {
        /// The procedure whose result failed to decode.
        procedure: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Keyring error when retrieving a stored password.
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Check if this error came from the transport or from a malformed result.
    ///
    /// These are the errors the client reports on its fault channel.
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode { .. })
    }

    /// Check if the remote end rejected the session or the credentials.
    pub fn is_auth_fault(&self) -> bool {
        matches!(self, ApiError::Transport(fault) if fault.is_auth_fault())
    }
}
