//! User group and membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use grchub_core::types::{FolderId, UserGroupId, UserId};

/// A named set of users that receives role assignments as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserGroup {
    /// Unique group identifier.
    pub id: UserGroupId,
    /// Group name.
    pub name: String,
    /// The folder the group belongs to.
    pub folder_id: FolderId,
    /// Shipped with the product rather than created by an administrator.
    pub builtin: bool,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
}

impl UserGroup {
    /// Build a new administrator-defined group.
    pub fn new(data: CreateUserGroup) -> Self {
        Self {
            id: UserGroupId::new(),
            name: data.name,
            folder_id: data.folder_id,
            builtin: false,
            created_at: Utc::now(),
        }
    }
}

/// Data required to create a user group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserGroup {
    /// Group name.
    pub name: String,
    /// Owning folder.
    pub folder_id: FolderId,
}

/// Membership of a user in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GroupMembership {
    /// Member.
    pub user_id: UserId,
    /// Group.
    pub user_group_id: UserGroupId,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
}

impl GroupMembership {
    /// Build a membership starting now.
    pub fn new(user_id: UserId, user_group_id: UserGroupId) -> Self {
        Self {
            user_id,
            user_group_id,
            created_at: Utc::now(),
        }
    }

    /// Composite key of the membership.
    pub fn key(&self) -> (UserId, UserGroupId) {
        (self.user_id, self.user_group_id)
    }
}
