//! The remote procedure catalog.
//!
//! Each remote procedure is a record whose fields are its positional
//! arguments, in wire order. The session token is not part of the record; the
//! client prepends it. Adding a procedure means adding one line to the
//! `remote_procedures!` table below.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{
    RemoteField, RemoteIssue, RemoteIssueType, RemotePermissionScheme, RemotePriority,
    RemoteProject, RemoteStatus, RemoteVersion, SchemeRef,
};

/// Wire name of the login procedure. It is the only one sent without a token.
pub const LOGIN: &str = "login";

/// A typed remote procedure.
pub trait RemoteProcedure {
    /// The procedure's name in the remote catalog.
    const NAME: &'static str;
    /// What the procedure returns.
    type Ret: DeserializeOwned;
    /// The positional arguments, without the session token.
    fn args(&self) -> Result<Vec<Value>, serde_json::Error>;
}

macro_rules! remote_procedures {
    ($(
        $(#[$meta:meta])*
        $ty:ident => $name:literal ( $($field:ident : $fty:ty),* $(,)? ) -> $ret:ty;
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $ty {
                $(pub $field: $fty,)*
            }

            impl RemoteProcedure for $ty {
                const NAME: &'static str = $name;
                type Ret = $ret;

                fn args(&self) -> Result<Vec<Value>, serde_json::Error> {
                    Ok(vec![$(serde_json::to_value(&self.$field)?),*])
                }
            }
        )*

        /// Wire names of every procedure in the table.
        pub const CATALOG: &[&str] = &[$($name),*];
    };
}

remote_procedures! {
    /// Fetch one issue by key.
    GetIssue => "getIssue"(key: String) -> RemoteIssue;
    /// List custom field definitions. Needs admin rights on most servers.
    GetCustomFields => "getCustomFields"() -> Vec<RemoteField>;
    /// List projects without their scheme details.
    GetProjectsNoSchemes => "getProjectsNoSchemes"() -> Vec<RemoteProject>;
    GetIssueTypes => "getIssueTypes"() -> Vec<RemoteIssueType>;
    CreateProject => "createProject"(
        key: String,
        name: String,
        description: String,
        url: String,
        lead: String,
        permission_scheme: Option<SchemeRef>,
        notification_scheme: Option<SchemeRef>,
        security_scheme: Option<SchemeRef>,
    ) -> RemoteProject;
    /// Replace a project's details. The record is matched by key.
    UpdateProject => "updateProject"(project: RemoteProject) -> RemoteProject;
    CreateIssue => "createIssue"(issue: RemoteIssue) -> RemoteIssue;
    /// Attach files to an issue. `file_names` and `data` are parallel lists.
    AddBase64EncodedAttachmentsToIssue => "addBase64EncodedAttachmentsToIssue"(
        key: String,
        file_names: Vec<String>,
        data: Vec<String>,
    ) -> bool;
    AddVersion => "addVersion"(project_key: String, version: RemoteVersion) -> RemoteVersion;
    GetVersions => "getVersions"(project_key: String) -> Vec<RemoteVersion>;
    /// Free-text search restricted to some projects.
    GetIssuesFromTextSearchWithProject => "getIssuesFromTextSearchWithProject"(
        project_keys: Vec<String>,
        search_terms: String,
        max_results: u32,
    ) -> Vec<RemoteIssue>;
    GetIssuesFromJqlSearch => "getIssuesFromJqlSearch"(jql: String, max_results: u32) -> Vec<RemoteIssue>;
    /// Count the issues matched by a saved filter.
    GetIssueCountForFilter => "getIssueCountForFilter"(filter_id: String) -> i64;
    GetPermissionSchemes => "getPermissionSchemes"() -> Vec<RemotePermissionScheme>;
    GetPriorities => "getPriorities"() -> Vec<RemotePriority>;
    GetStatuses => "getStatuses"() -> Vec<RemoteStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_lists_every_procedure_once() {
        assert_eq!(CATALOG.len(), 16);
        let mut names = CATALOG.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
        assert!(!CATALOG.contains(&LOGIN));
    }

    #[test]
    fn test_no_arg_procedure_has_empty_args() {
        assert!(GetStatuses {}.args().unwrap().is_empty());
        assert_eq!(GetStatuses::NAME, "getStatuses");
    }

    #[test]
    fn test_create_project_args_in_wire_order() {
        let proc = CreateProject {
            key: "PROJ".to_string(),
            name: "Project".to_string(),
            description: "A project".to_string(),
            url: "https://example.com".to_string(),
            lead: "alice".to_string(),
            permission_scheme: Some(SchemeRef::new(0)),
            notification_scheme: None,
            security_scheme: None,
        };

        assert_eq!(
            proc.args().unwrap(),
            vec![
                json!("PROJ"),
                json!("Project"),
                json!("A project"),
                json!("https://example.com"),
                json!("alice"),
                json!({"id": 0}),
                Value::Null,
                Value::Null,
            ]
        );
    }

    #[test]
    fn test_add_version_args() {
        let proc = AddVersion {
            project_key: "PROJ".to_string(),
            version: RemoteVersion::new("1.0", false, false),
        };

        assert_eq!(AddVersion::NAME, "addVersion");
        assert_eq!(
            proc.args().unwrap(),
            vec![
                json!("PROJ"),
                json!({"name": "1.0", "archived": false, "released": false})
            ]
        );
    }

    #[test]
    fn test_text_search_args() {
        let proc = GetIssuesFromTextSearchWithProject {
            project_keys: vec!["PROJ".to_string(), "OPS".to_string()],
            search_terms: "bug".to_string(),
            max_results: 10,
        };

        assert_eq!(
            proc.args().unwrap(),
            vec![json!(["PROJ", "OPS"]), json!("bug"), json!(10)]
        );
    }
}
