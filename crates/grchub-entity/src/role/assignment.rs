//! Role assignment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use grchub_core::types::{FolderId, RoleAssignmentId, RoleId, UserGroupId, UserId};

/// Who receives a role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Principal {
    /// A single user.
    User(UserId),
    /// Every member of a user group.
    Group(UserGroupId),
}

/// A role granted to a principal on a perimeter folder.
///
/// Exactly one of `user_id` and `user_group_id` is set; use
/// [`RoleAssignment::principal`] instead of reading them directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RoleAssignment {
    /// Unique assignment identifier.
    pub id: RoleAssignmentId,
    /// The granted role.
    pub role_id: RoleId,
    /// Receiving user, for direct grants.
    pub user_id: Option<UserId>,
    /// Receiving group, for group grants.
    pub user_group_id: Option<UserGroupId>,
    /// Perimeter folder.
    pub folder_id: FolderId,
    /// Whether the grant also covers every descendant of `folder_id`.
    pub is_recursive: bool,
    /// When the assignment was created.
    pub created_at: DateTime<Utc>,
}

impl RoleAssignment {
    /// Build a new assignment.
    pub fn new(data: CreateRoleAssignment) -> Self {
        let (user_id, user_group_id) = match data.principal {
            Principal::User(id) => (Some(id), None),
            Principal::Group(id) => (None, Some(id)),
        };
        Self {
            id: RoleAssignmentId::new(),
            role_id: data.role_id,
            user_id,
            user_group_id,
            folder_id: data.folder_id,
            is_recursive: data.is_recursive,
            created_at: Utc::now(),
        }
    }

    /// The principal receiving this assignment, or `None` for a malformed row.
    pub fn principal(&self) -> Option<Principal> {
        match (self.user_id, self.user_group_id) {
            (Some(user), None) => Some(Principal::User(user)),
            (None, Some(group)) => Some(Principal::Group(group)),
            _ => None,
        }
    }
}

/// Data required to create a role assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleAssignment {
    /// The role to grant.
    pub role_id: RoleId,
    /// The receiving principal.
    pub principal: Principal,
    /// Perimeter folder.
    pub folder_id: FolderId,
    /// Whether the grant covers the folder's descendants.
    pub is_recursive: bool,
}
