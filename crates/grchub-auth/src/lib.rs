//! # grchub-auth
//!
//! Authorization building blocks for GRC Hub.
//!
//! ## Modules
//!
//! - `seat`: editor seat accounting against the licensed cap
//! - `perm`: folder-scoped permission evaluation over role grants

pub mod perm;
pub mod seat;

pub use perm::{EffectiveGrant, PermissionEvaluator};
pub use seat::{SeatLimiter, SeatStatus};
