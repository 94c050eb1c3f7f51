//! Roles, permission codenames, and role assignments.

pub mod assignment;
pub mod model;
pub mod permission;

pub use assignment::{CreateRoleAssignment, Principal, RoleAssignment};
pub use model::{CreateRole, Role};
pub use permission::is_edit_capable;
