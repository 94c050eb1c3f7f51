//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use grchub_core::types::FolderId;

/// A folder in the organizational scoping tree.
///
/// Folders only point at their parent; children are found by reverse
/// lookup on `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Parent folder (None only for the root).
    pub parent_id: Option<FolderId>,
    /// Whether this is the unique root folder.
    pub is_root: bool,
    /// Created by the system during bootstrap rather than by an administrator.
    pub builtin: bool,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Build the builtin root folder.
    pub fn new_root(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FolderId::new(),
            name: name.into(),
            description: None,
            parent_id: None,
            is_root: true,
            builtin: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a regular folder placed under `parent`.
    pub fn new_child(data: CreateFolder, parent: FolderId) -> Self {
        let now = Utc::now();
        Self {
            id: FolderId::new(),
            name: data.name,
            description: data.description,
            parent_id: Some(parent),
            is_root: false,
            builtin: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Parent folder; `None` places the folder directly under the root.
    pub parent_id: Option<FolderId>,
}

impl CreateFolder {
    /// Shorthand for a folder with only a name and parent.
    pub fn named(name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parent_id,
        }
    }
}
