//! # grchub-service
//!
//! Business logic for GRC Hub. The [`FolderHierarchy`] owns the folder
//! tree; the [`IamService`] owns users, roles, groups, and assignments and
//! enforces editor seats. Services are built once at startup and shared
//! through `Arc` handles.

pub mod context;
pub mod folder;
pub mod iam;

pub use context::RequestContext;
pub use folder::{FolderHierarchy, FolderService, TreeService, UpdateFolder};
pub use iam::IamService;
