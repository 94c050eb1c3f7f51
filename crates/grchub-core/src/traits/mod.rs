//! Core traits defined in `grchub-core` and implemented by other crates.

pub mod folder_scope;
pub mod repository;

pub use folder_scope::FolderScope;
pub use repository::Repository;
