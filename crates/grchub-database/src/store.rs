//! One repository per entity, for either backend.

use std::sync::Arc;

use grchub_core::traits::Repository;
use grchub_core::types::{FolderId, RoleAssignmentId, RoleId, UserGroupId, UserId};
use grchub_entity::folder::Folder;
use grchub_entity::group::{GroupMembership, UserGroup};
use grchub_entity::role::{Role, RoleAssignment};
use grchub_entity::user::User;

use crate::connection::DatabasePool;
use crate::memory::MemoryRepository;
use crate::repositories::{
    PgFolderRepository, PgMembershipRepository, PgRoleAssignmentRepository, PgRoleRepository,
    PgUserGroupRepository, PgUserRepository,
};

/// Trait-object handles to every entity repository.
#[derive(Clone)]
pub struct Repositories {
    /// Folder rows.
    pub folders: Arc<dyn Repository<Folder, FolderId>>,
    /// User rows.
    pub users: Arc<dyn Repository<User, UserId>>,
    /// Role rows.
    pub roles: Arc<dyn Repository<Role, RoleId>>,
    /// User group rows.
    pub groups: Arc<dyn Repository<UserGroup, UserGroupId>>,
    /// Group membership rows.
    pub memberships: Arc<dyn Repository<GroupMembership, (UserId, UserGroupId)>>,
    /// Role assignment rows.
    pub assignments: Arc<dyn Repository<RoleAssignment, RoleAssignmentId>>,
}

impl Repositories {
    /// Empty process-local repositories.
    pub fn memory() -> Self {
        Self {
            folders: Arc::new(MemoryRepository::new("Folder", |f: &Folder| f.id)),
            users: Arc::new(MemoryRepository::new("User", |u: &User| u.id)),
            roles: Arc::new(MemoryRepository::new("Role", |r: &Role| r.id)),
            groups: Arc::new(MemoryRepository::new("User group", |g: &UserGroup| g.id)),
            memberships: Arc::new(MemoryRepository::new(
                "Membership",
                GroupMembership::key as fn(&GroupMembership) -> (UserId, UserGroupId),
            )),
            assignments: Arc::new(MemoryRepository::new(
                "Role assignment",
                |a: &RoleAssignment| a.id,
            )),
        }
    }

    /// PostgreSQL repositories sharing `pool`.
    pub fn postgres(pool: &DatabasePool) -> Self {
        let pool = pool.pool().clone();
        Self {
            folders: Arc::new(PgFolderRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            roles: Arc::new(PgRoleRepository::new(pool.clone())),
            groups: Arc::new(PgUserGroupRepository::new(pool.clone())),
            memberships: Arc::new(PgMembershipRepository::new(pool.clone())),
            assignments: Arc::new(PgRoleAssignmentRepository::new(pool)),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
