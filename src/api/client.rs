//! Sessioned RPC client implementation.
//!
//! This module provides the main client for the JIRA RPC procedure catalog.
//! It logs in once, keeps the session token, and prepends that token to every
//! remote procedure call. Faults are reported through a [`FaultReporter`] and
//! returned to the caller; nothing is retried.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::http::HttpTransport;
use super::procedure::{self as rpc, RemoteProcedure, LOGIN};
use super::report::{SharedReporter, TracingReporter};
use super::session::{Credentials, SessionToken};
use super::transport::Transport;
use super::types::{
    Attachment, NewProject, RemoteField, RemoteIssue, RemoteIssueType, RemotePermissionScheme,
    RemotePriority, RemoteProject, RemoteStatus, RemoteVersion,
};
use crate::config::{Config, Profile, Settings};
use crate::error::Result as AppResult;

/// The JIRA RPC client.
///
/// Created by logging in. If the login fails the fault is reported and the
/// client is still returned, unauthenticated: later calls go out with an empty
/// token and the server rejects them. The token is never refreshed behind the
/// caller's back; call [`JiraRpcClient::login`] again to replace it.
pub struct JiraRpcClient<T: Transport = HttpTransport> {
    /// The transport used for every call.
    transport: T,
    /// The session token, once logged in.
    token: Option<SessionToken>,
    /// Where faults are reported.
    reporter: SharedReporter,
}

impl JiraRpcClient<HttpTransport> {
    /// Connect to `endpoint` over JSON-RPC and log in.
    ///
    /// # Errors
    ///
    /// Returns an error only if the endpoint is unusable. A failed login is
    /// reported, not returned; check [`JiraRpcClient::is_authenticated`].
    #[instrument(skip(credentials), fields(username = %credentials.username()))]
    pub async fn connect(credentials: Credentials, endpoint: &str) -> Result<Self> {
        let transport = HttpTransport::new(endpoint)?;
        Ok(Self::with_transport(transport, credentials).await)
    }

    /// Connect using a configured profile.
    ///
    /// The password is read from the OS keyring.
    ///
    /// # Errors
    ///
    /// Returns an error if the password cannot be retrieved or the endpoint
    /// is unusable.
    #[instrument(skip(profile, settings), fields(profile_name = %profile.name))]
    pub async fn from_profile(profile: &Profile, settings: &Settings) -> Result<Self> {
        info!("Creating RPC client for profile");

        let credentials = Credentials::from_keyring(&profile.name, &profile.username)?;
        let transport = HttpTransport::with_timeout(&profile.endpoint, settings.timeout())?;

        Ok(Self::with_transport(transport, credentials).await)
    }

    /// Connect using the named profile, or the default one, from `config`.
    pub async fn from_config(config: &Config, profile: Option<&str>) -> AppResult<Self> {
        let profile = match profile {
            Some(name) => config.profile(name)?,
            None => config.default_profile()?,
        };
        Ok(Self::from_profile(profile, &config.settings).await?)
    }
}

impl<T: Transport> JiraRpcClient<T> {
    /// Log in over an arbitrary transport, reporting faults to the log.
    pub async fn with_transport(transport: T, credentials: Credentials) -> Self {
        Self::with_reporter(transport, Arc::new(TracingReporter), credentials).await
    }

    /// Log in over an arbitrary transport with a custom fault reporter.
    pub async fn with_reporter(
        transport: T,
        reporter: SharedReporter,
        credentials: Credentials,
    ) -> Self {
        let mut client = Self::unauthenticated(transport, reporter);
        if client.login(credentials).await.is_err() {
            warn!("Continuing without a session token");
        }
        client
    }

    /// Create a client that has not logged in yet.
    pub fn unauthenticated(transport: T, reporter: SharedReporter) -> Self {
        Self {
            transport,
            token: None,
            reporter,
        }
    }

    /// Log in and store the returned session token.
    ///
    /// On failure the fault is reported and returned, and any previous token
    /// is kept.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&mut self, credentials: Credentials) -> Result<()> {
        debug!("Logging in");

        let args = credentials
            .into_login_args()
            .into_iter()
            .map(Value::String)
            .collect();
        let value = self
            .transport
            .invoke(LOGIN, args)
            .await
            .map_err(|e| self.fault(LOGIN, e))?;
        let token: String = self.decode(LOGIN, value)?;

        self.token = Some(SessionToken::new(token));
        info!("Logged in");
        Ok(())
    }

    /// Check if a login has succeeded.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Get the session token, if logged in.
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invoke a remote procedure by name.
    ///
    /// The session token is prepended to `args` and the raw result is
    /// returned unmodified. Without a token an empty string is sent in its
    /// place.
    #[instrument(skip(self, args), fields(arity = args.len()))]
    pub async fn invoke(&self, procedure: &str, args: Vec<Value>) -> Result<Value> {
        let token = self.token.as_ref().map(SessionToken::as_str).unwrap_or_default();

        let mut params = Vec::with_capacity(args.len() + 1);
        params.push(Value::String(token.to_string()));
        params.extend(args);

        self.transport
            .invoke(procedure, params)
            .await
            .map_err(|e| self.fault(procedure, e))
    }

    /// Invoke a typed remote procedure and decode its result.
    #[instrument(skip_all, fields(procedure = P::NAME))]
    pub async fn call<P: RemoteProcedure>(&self, procedure: P) -> Result<P::Ret> {
        let args = procedure
            .args()
            .map_err(|e| self.fault(P::NAME, ApiError::Encode(e)))?;
        let value = self.invoke(P::NAME, args).await?;
        self.decode(P::NAME, value)
    }

    /// Get a single issue by key (e.g., "PROJ-123").
    pub async fn get_issue(&self, key: &str) -> Result<RemoteIssue> {
        self.call(rpc::GetIssue {
            key: key.to_string(),
        })
        .await
    }

    /// List all custom field definitions.
    pub async fn get_custom_fields(&self) -> Result<Vec<RemoteField>> {
        self.call(rpc::GetCustomFields {}).await
    }

    /// List the projects visible to the user.
    pub async fn get_projects(&self) -> Result<Vec<RemoteProject>> {
        self.call(rpc::GetProjectsNoSchemes {}).await
    }

    /// List all issue types, subtask types included.
    pub async fn get_issue_types(&self) -> Result<Vec<RemoteIssueType>> {
        self.call(rpc::GetIssueTypes {}).await
    }

    /// Create a project.
    pub async fn create_project(&self, project: &NewProject) -> Result<RemoteProject> {
        let project = project.clone();
        self.call(rpc::CreateProject {
            key: project.key,
            name: project.name,
            description: project.description,
            url: project.url,
            lead: project.lead,
            permission_scheme: project.permission_scheme,
            notification_scheme: project.notification_scheme,
            security_scheme: project.security_scheme,
        })
        .await
    }

    /// Update a project from a full project record.
    pub async fn update_project(&self, project: &RemoteProject) -> Result<RemoteProject> {
        self.call(rpc::UpdateProject {
            project: project.clone(),
        })
        .await
    }

    /// Create an issue. Custom field values travel inside the record.
    pub async fn create_issue(&self, issue: &RemoteIssue) -> Result<RemoteIssue> {
        self.call(rpc::CreateIssue {
            issue: issue.clone(),
        })
        .await
    }

    /// Attach files to an issue.
    pub async fn add_attachments(&self, key: &str, attachments: &[Attachment]) -> Result<bool> {
        let (file_names, data) = attachments
            .iter()
            .map(|a| (a.file_name.clone(), a.data.clone()))
            .unzip();

        self.call(rpc::AddBase64EncodedAttachmentsToIssue {
            key: key.to_string(),
            file_names,
            data,
        })
        .await
    }

    /// Create a version in a project.
    pub async fn create_version(
        &self,
        project_key: &str,
        name: &str,
        archived: bool,
        released: bool,
    ) -> Result<RemoteVersion> {
        self.call(rpc::AddVersion {
            project_key: project_key.to_string(),
            version: RemoteVersion::new(name, archived, released),
        })
        .await
    }

    /// List the versions of a project.
    pub async fn get_versions(&self, project_key: &str) -> Result<Vec<RemoteVersion>> {
        self.call(rpc::GetVersions {
            project_key: project_key.to_string(),
        })
        .await
    }

    /// Free-text search within the given projects.
    pub async fn search(
        &self,
        project_keys: &[&str],
        text: &str,
        limit: u32,
    ) -> Result<Vec<RemoteIssue>> {
        self.call(rpc::GetIssuesFromTextSearchWithProject {
            project_keys: project_keys.iter().map(|k| k.to_string()).collect(),
            search_terms: text.to_string(),
            max_results: limit,
        })
        .await
    }

    /// Search for issues using JQL.
    pub async fn jql_search(&self, jql: &str, limit: u32) -> Result<Vec<RemoteIssue>> {
        self.call(rpc::GetIssuesFromJqlSearch {
            jql: jql.to_string(),
            max_results: limit,
        })
        .await
    }

    /// Count the issues matched by a saved filter.
    pub async fn issue_count_for_filter(&self, filter_id: &str) -> Result<i64> {
        self.call(rpc::GetIssueCountForFilter {
            filter_id: filter_id.to_string(),
        })
        .await
    }

    /// List the permission schemes, e.g. to pick one for [`Self::create_project`].
    pub async fn get_permission_schemes(&self) -> Result<Vec<RemotePermissionScheme>> {
        self.call(rpc::GetPermissionSchemes {}).await
    }

    /// List the issue priorities.
    pub async fn get_priorities(&self) -> Result<Vec<RemotePriority>> {
        self.call(rpc::GetPriorities {}).await
    }

    /// List the issue statuses.
    pub async fn get_statuses(&self) -> Result<Vec<RemoteStatus>> {
        self.call(rpc::GetStatuses {}).await
    }

    /// Decode a raw result, reporting a mismatch as a fault.
    fn decode<R: serde::de::DeserializeOwned>(&self, procedure: &str, value: Value) -> Result<R> {
        serde_json::from_value(value).map_err(|source| {
            self.fault(
                procedure,
                ApiError::Decode {
                    procedure: procedure.to_string(),
                    source,
                },
            )
        })
    }

    /// Report a fault and hand it back for propagation.
    fn fault(&self, procedure: &str, err: impl Into<ApiError>) -> ApiError {
        let err = err.into();
        self.reporter.report(procedure, &err);
        err
    }
}

impl<T: Transport> fmt::Debug for JiraRpcClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraRpcClient")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
