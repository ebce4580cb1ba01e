//! Permission model for checklist editing and viewing.
//!
//! Authorization is a capability injected at call sites: pure predicates
//! like `Checklist::editable_by` consult an [`Authorizer`] rather than a
//! global user registry. The CLI resolves one from config grants
//! (`perm.<project>.<user>` keys); a workspace with no grants configured is
//! treated as single-user and every permission is held.

use crate::error::ChecklistError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Scope key matching any project, including items with no project.
const WILDCARD_SCOPE: &str = "*";

/// Checklist permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewChecklists,
    EditChecklists,
    EditOwnChecklists,
}

impl Permission {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewChecklists => "view_checklists",
            Self::EditChecklists => "edit_checklists",
            Self::EditOwnChecklists => "edit_own_checklists",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ChecklistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view_checklists" => Ok(Self::ViewChecklists),
            "edit_checklists" => Ok(Self::EditChecklists),
            "edit_own_checklists" => Ok(Self::EditOwnChecklists),
            other => Err(ChecklistError::UnknownPermission {
                name: other.to_string(),
            }),
        }
    }
}

/// Permission lookup capability.
pub trait Authorizer {
    /// True when `user` holds `permission` on `project`.
    fn allowed_to(&self, user: &str, permission: Permission, project: Option<&str>) -> bool;
}

/// Single-user default: every permission is held.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn allowed_to(&self, _user: &str, _permission: Permission, _project: Option<&str>) -> bool {
        true
    }
}

/// Config-backed grant table.
///
/// Grants come from flattened config keys of the form
/// `perm.<project>.<user>` (or `perm.*.<user>` for all projects) whose
/// value is a comma-separated permission list. Unknown permission names in
/// a grant value are skipped with a warning rather than failing the load.
#[derive(Debug, Clone, Default)]
pub struct GrantTable {
    grants: HashMap<(String, String), HashSet<Permission>>,
}

impl GrantTable {
    /// Build from flattened config pairs, keeping only `perm.` keys.
    #[must_use]
    pub fn from_config_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
        let mut grants: HashMap<(String, String), HashSet<Permission>> = HashMap::new();

        for (key, value) in pairs {
            let Some(rest) = key.strip_prefix("perm.") else {
                continue;
            };
            let Some((scope, user)) = rest.split_once('.') else {
                tracing::warn!("ignoring malformed permission key: {key}");
                continue;
            };

            let entry = grants
                .entry((scope.to_string(), user.to_string()))
                .or_default();
            for name in value.split(',') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                match Permission::from_str(name) {
                    Ok(permission) => {
                        entry.insert(permission);
                    }
                    Err(_) => {
                        tracing::warn!("ignoring unknown permission '{name}' in {key}");
                    }
                }
            }
        }

        Self { grants }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    fn scope_allows(&self, scope: &str, user: &str, permission: Permission) -> bool {
        self.grants
            .get(&(scope.to_string(), user.to_string()))
            .is_some_and(|set| set.contains(&permission))
    }
}

impl Authorizer for GrantTable {
    fn allowed_to(&self, user: &str, permission: Permission, project: Option<&str>) -> bool {
        if let Some(project) = project {
            if self.scope_allows(project, user, permission) {
                return true;
            }
        }
        self.scope_allows(WILDCARD_SCOPE, user, permission)
    }
}

/// Authorizer resolved from workspace config.
///
/// No `perm.` keys configured means an open, single-user workspace.
#[derive(Debug, Clone)]
pub enum ResolvedAuthorizer {
    Open,
    Grants(GrantTable),
}

impl ResolvedAuthorizer {
    /// Resolve from a flattened config map.
    #[must_use]
    pub fn from_config(config: &HashMap<String, String>) -> Self {
        let table = GrantTable::from_config_pairs(
            config.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        if table.is_empty() {
            Self::Open
        } else {
            Self::Grants(table)
        }
    }
}

impl Authorizer for ResolvedAuthorizer {
    fn allowed_to(&self, user: &str, permission: Permission, project: Option<&str>) -> bool {
        match self {
            Self::Open => AllowAll.allowed_to(user, permission, project),
            Self::Grants(table) => table.allowed_to(user, permission, project),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> GrantTable {
        GrantTable::from_config_pairs(entries.iter().copied())
    }

    #[test]
    fn permission_roundtrip() {
        assert_eq!(
            "edit_checklists".parse::<Permission>().unwrap(),
            Permission::EditChecklists
        );
        assert_eq!(Permission::ViewChecklists.as_str(), "view_checklists");
        assert!("edit_everything".parse::<Permission>().is_err());
    }

    #[test]
    fn grant_table_project_scope() {
        let t = table(&[("perm.apollo.alice", "edit_checklists,view_checklists")]);
        assert!(t.allowed_to("alice", Permission::EditChecklists, Some("apollo")));
        assert!(!t.allowed_to("alice", Permission::EditChecklists, Some("gemini")));
        assert!(!t.allowed_to("bob", Permission::EditChecklists, Some("apollo")));
    }

    #[test]
    fn grant_table_wildcard_scope() {
        let t = table(&[("perm.*.alice", "view_checklists")]);
        assert!(t.allowed_to("alice", Permission::ViewChecklists, Some("apollo")));
        assert!(t.allowed_to("alice", Permission::ViewChecklists, None));
        assert!(!t.allowed_to("alice", Permission::EditChecklists, Some("apollo")));
    }

    #[test]
    fn projectless_items_only_match_wildcard() {
        let t = table(&[("perm.apollo.alice", "edit_checklists")]);
        assert!(!t.allowed_to("alice", Permission::EditChecklists, None));
    }

    #[test]
    fn unknown_permission_names_are_skipped() {
        let t = table(&[("perm.*.alice", "fly_rockets,view_checklists")]);
        assert!(t.allowed_to("alice", Permission::ViewChecklists, None));
    }

    #[test]
    fn resolved_authorizer_defaults_open() {
        let auth = ResolvedAuthorizer::from_config(&HashMap::new());
        assert!(auth.allowed_to("anyone", Permission::EditChecklists, None));
    }

    #[test]
    fn resolved_authorizer_uses_grants_when_configured() {
        let mut config = HashMap::new();
        config.insert("perm.apollo.alice".to_string(), "edit_checklists".to_string());
        let auth = ResolvedAuthorizer::from_config(&config);
        assert!(auth.allowed_to("alice", Permission::EditChecklists, Some("apollo")));
        assert!(!auth.allowed_to("bob", Permission::EditChecklists, Some("apollo")));
    }
}
