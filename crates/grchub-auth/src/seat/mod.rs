//! Editor seat accounting.
//!
//! An editor is a user holding at least one edit-capable permission
//! through any role assignment. Every editor occupies one licensed seat.

pub mod limiter;

pub use limiter::{SeatLimiter, SeatStatus};
