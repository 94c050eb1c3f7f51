//! # grchub-api
//!
//! HTTP API layer for GRC Hub built on Axum.
//!
//! Provides the REST endpoints for folders, users, roles, groups, role
//! assignments, and license seats, plus middleware (request ids, logging,
//! CORS, timeouts), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
