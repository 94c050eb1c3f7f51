//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use grchub_core::types::RoleId;

use super::permission::is_edit_capable;

/// A named bundle of permission codenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Permission codenames granted by this role.
    pub permissions: Vec<String>,
    /// Shipped with the product rather than created by an administrator.
    pub builtin: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Build a new administrator-defined role.
    pub fn new(data: CreateRole) -> Self {
        let mut permissions = data.permissions;
        permissions.sort();
        permissions.dedup();
        Self {
            id: RoleId::new(),
            name: data.name,
            description: data.description,
            permissions,
            builtin: false,
            created_at: Utc::now(),
        }
    }

    /// Whether the role carries `codename`.
    pub fn has_permission(&self, codename: &str) -> bool {
        self.permissions.iter().any(|p| p == codename)
    }

    /// Whether any of the role's permissions is edit-capable.
    pub fn grants_edit<S: AsRef<str>>(&self, editor_prefixes: &[S]) -> bool {
        self.permissions
            .iter()
            .any(|p| is_edit_capable(p, editor_prefixes))
    }
}

/// Data required to create a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    /// Role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Permission codenames.
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_role_dedups_permissions() {
        let role = Role::new(CreateRole {
            name: "Analyst".to_string(),
            description: None,
            permissions: vec![
                "view_risk".to_string(),
                "change_risk".to_string(),
                "view_risk".to_string(),
            ],
        });
        assert_eq!(role.permissions, vec!["change_risk", "view_risk"]);
        assert!(role.grants_edit(&["add_", "change_", "delete_"]));
        assert!(role.has_permission("view_risk"));
        assert!(!role.has_permission("delete_risk"));
    }
}
