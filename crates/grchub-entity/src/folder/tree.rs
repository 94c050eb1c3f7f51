//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use grchub_core::types::FolderId;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Distance from the node the tree was requested for.
    pub depth: u32,
    /// Number of direct child folders.
    pub child_count: u64,
    /// Child folder nodes, sorted by name.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Total number of nodes in this subtree, including `self`.
    pub fn size(&self) -> u64 {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}
