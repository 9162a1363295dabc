//! Remote record types.
//!
//! These model the objects of the RPC plugin's procedure catalog (`RemoteIssue`,
//! `RemoteProject`, ...). Only the commonly used fields are typed. Everything
//! else lands in `extra` and goes back out unchanged, so records fetched from
//! one server version can be sent back to it without losing fields.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fields this crate does not model, kept verbatim.
pub type Extra = Map<String, Value>;

/// Read `null` the same as an absent field.
///
/// The server's JSON mapper writes unset lists, flags and names as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A JIRA issue.
///
/// Returned by `getIssue` and the search procedures; sent to `createIssue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteIssue {
    /// The issue ID, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The issue key (e.g., "PROJ-123"), assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// The project key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// The issue type ID.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    /// The issue summary/title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// The issue description (wiki markup).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The priority ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// The status ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// The assignee's username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// The reporter's username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    /// The due date, as the server sent it.
    ///
    /// JSON-RPC servers send epoch milliseconds; a date string is also accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duedate: Option<Value>,
    /// Custom field values.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub custom_field_values: Vec<RemoteCustomFieldValue>,
    /// Anything else the server sent.
    #[serde(flatten)]
    pub extra: Extra,
}

impl RemoteIssue {
    /// Start a new issue for `project` of the given type.
    pub fn new(
        project: impl Into<String>,
        issue_type: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            project: Some(project.into()),
            issue_type: Some(issue_type.into()),
            summary: Some(summary.into()),
            ..Self::default()
        }
    }

    /// Add a custom field value.
    pub fn with_custom_field(mut self, value: RemoteCustomFieldValue) -> Self {
        self.custom_field_values.push(value);
        self
    }

    /// Get the issue key, or an empty string for an unsaved issue.
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }

    /// Get the summary, or an empty string if not set.
    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    /// Look up the values of a custom field by its ID (e.g., "customfield_10010").
    pub fn custom_field(&self, id: &str) -> Option<&[String]> {
        self.custom_field_values
            .iter()
            .find(|v| v.customfield_id == id)
            .map(|v| v.values.as_slice())
    }
}

impl fmt::Display for RemoteIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key(), self.summary())
    }
}

/// The value of one custom field on an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCustomFieldValue {
    /// The custom field ID (e.g., "customfield_10010").
    #[serde(default, deserialize_with = "null_as_default")]
    pub customfield_id: String,
    /// Parent option key for cascading selects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// The values.
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

impl RemoteCustomFieldValue {
    /// Create a custom field value.
    pub fn new(customfield_id: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            customfield_id: customfield_id.into(),
            key: None,
            values,
        }
    }
}

/// A custom field definition, as returned by `getCustomFields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteField {
    /// The field ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// The field name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Anything else the server sent.
    #[serde(flatten)]
    pub extra: Extra,
}

/// A reference to a permission, notification or issue security scheme.
///
/// Only the ID matters when creating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRef {
    /// The scheme ID.
    pub id: i64,
}

impl SchemeRef {
    /// Reference the scheme with the given ID.
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

/// A JIRA project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProject {
    /// The project ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The project key (e.g., "PROJ").
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    /// The project name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// The project description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The project homepage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The project lead's username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,
    /// Anything else the server sent (schemes, projectUrl...).
    #[serde(flatten)]
    pub extra: Extra,
}

impl fmt::Display for RemoteProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.key)
    }
}

/// Everything `createProject` needs.
///
/// Schemes are optional; the server falls back to its defaults when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    /// The project key (e.g., "PROJ").
    pub key: String,
    /// The project name.
    pub name: String,
    /// The project description.
    pub description: String,
    /// The project homepage.
    pub url: String,
    /// The project lead's username.
    pub lead: String,
    /// The permission scheme to apply.
    pub permission_scheme: Option<SchemeRef>,
    /// The notification scheme to apply.
    pub notification_scheme: Option<SchemeRef>,
    /// The issue security scheme to apply.
    pub security_scheme: Option<SchemeRef>,
}

/// An issue type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteIssueType {
    /// The issue type ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// The issue type name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// The issue type description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this is a subtask type.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_task: bool,
    /// Anything else the server sent.
    #[serde(flatten)]
    pub extra: Extra,
}

impl fmt::Display for RemoteIssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A project version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVersion {
    /// The version ID, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The version name (e.g., "1.0").
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Whether the version is archived.
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: bool,
    /// Whether the version is released.
    #[serde(default, deserialize_with = "null_as_default")]
    pub released: bool,
    /// Anything else the server sent (releaseDate, sequence...).
    #[serde(flatten)]
    pub extra: Extra,
}

impl RemoteVersion {
    /// Create a version record to send to `addVersion`.
    pub fn new(name: impl Into<String>, archived: bool, released: bool) -> Self {
        Self {
            name: name.into(),
            archived,
            released,
            ..Self::default()
        }
    }
}

/// A permission scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePermissionScheme {
    /// The scheme ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    /// The scheme name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// The scheme description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Anything else the server sent (permissionMappings...).
    #[serde(flatten)]
    pub extra: Extra,
}

impl RemotePermissionScheme {
    /// Reference this scheme when creating a project.
    pub fn scheme_ref(&self) -> SchemeRef {
        SchemeRef::new(self.id)
    }
}

/// An issue priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePriority {
    /// The priority ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// The priority name (e.g., "Blocker", "Major", "Minor").
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// The priority colour (e.g., "#cc0000").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Anything else the server sent.
    #[serde(flatten)]
    pub extra: Extra,
}

impl fmt::Display for RemotePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An issue status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteStatus {
    /// The status ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// The status name (e.g., "Open", "Resolved").
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Anything else the server sent.
    #[serde(flatten)]
    pub extra: Extra,
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A file to attach to an issue, already base64-encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// The file name shown in JIRA.
    pub file_name: String,
    /// The base64-encoded file contents.
    pub data: String,
}

impl Attachment {
    /// Create an attachment from raw bytes.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            data: BASE64.encode(bytes),
        }
    }

    /// Create an attachment from data that is already base64-encoded.
    pub fn from_base64(file_name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Contents can be megabytes; only show the size.
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("encoded_len", &self.data.len())
            .finish()
    }
}
