//! JIRA RPC client and types.
//!
//! This module provides the interface for calling the JIRA RPC plugin's
//! procedure catalog over an authenticated session.

mod client;
pub mod error;
mod http;
pub mod procedure;
mod report;
mod session;
mod transport;
pub mod types;

pub use client::JiraRpcClient;
pub use error::ApiError;
pub use http::{HttpTransport, DEFAULT_TIMEOUT_SECS};
pub use procedure::RemoteProcedure;
pub use report::{FaultReporter, SharedReporter, TracingReporter};
pub use session::{get_password, has_password, Credentials, SessionToken};
pub use transport::{Transport, TransportFault};
