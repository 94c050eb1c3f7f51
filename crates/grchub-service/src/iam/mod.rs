//! Identity and access management: users, roles, groups, assignments.

pub mod service;
pub mod state;

pub use service::IamService;
pub use state::IamState;
