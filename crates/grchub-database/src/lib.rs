//! # grchub-database
//!
//! Persistence for GRC Hub entities. Two backends implement the core
//! [`Repository`](grchub_core::traits::Repository) trait:
//!
//! - PostgreSQL repositories built on sqlx, with embedded migrations.
//! - A process-local [`MemoryRepository`] used for development and tests.
//!
//! [`Repositories`] bundles one repository per entity for either backend.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryRepository;
pub use store::Repositories;
