//! # grchub-core
//!
//! Core crate for GRC Hub. Contains the unified error system, typed
//! identifiers, pagination types, configuration schemas, and the traits
//! implemented by the persistence and hierarchy crates.
//!
//! This crate has **no** internal dependencies on other GRC Hub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
