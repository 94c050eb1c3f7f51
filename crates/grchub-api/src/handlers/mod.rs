//! Route handlers organized by domain.

pub mod assignment;
pub mod folder;
pub mod group;
pub mod health;
pub mod license;
pub mod role;
pub mod user;
