//! jira-rpc - a sessioned client for the JIRA RPC procedure catalog
//!
//! Logs in once, keeps the session token, and exposes the remote procedures
//! as typed async methods on [`JiraRpcClient`].

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{ApiError, Credentials, JiraRpcClient};
pub use config::{Config, Profile, Settings};
pub use error::AppError;
