//! Folder hierarchy, tree views, and the folder service facade.

pub mod hierarchy;
pub mod index;
pub mod service;
pub mod tree;

pub use hierarchy::FolderHierarchy;
pub use index::{FolderIndex, Reparent};
pub use service::{FolderService, UpdateFolder};
pub use tree::TreeService;
