//! PostgreSQL repository implementations for every GRC Hub entity.

pub mod assignment;
pub mod folder;
pub mod group;
pub mod membership;
pub mod role;
pub mod user;

pub use assignment::PgRoleAssignmentRepository;
pub use folder::PgFolderRepository;
pub use group::PgUserGroupRepository;
pub use membership::PgMembershipRepository;
pub use role::PgRoleRepository;
pub use user::PgUserRepository;
