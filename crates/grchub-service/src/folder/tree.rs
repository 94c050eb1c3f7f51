//! Folder tree building and breadcrumb resolution.

use std::sync::Arc;

use grchub_core::config::HierarchyConfig;
use grchub_core::error::AppError;
use grchub_core::result::AppResult;
use grchub_core::types::FolderId;
use grchub_entity::folder::{Folder, FolderNode};

use super::hierarchy::FolderHierarchy;
use super::index::FolderIndex;

/// Builds nested views of the hierarchy.
#[derive(Debug, Clone)]
pub struct TreeService {
    hierarchy: Arc<FolderHierarchy>,
    default_depth: u32,
    max_depth: u32,
}

impl TreeService {
    /// Creates a new tree service with the depth limits from `config`.
    pub fn new(hierarchy: Arc<FolderHierarchy>, config: &HierarchyConfig) -> Self {
        Self {
            hierarchy,
            default_depth: config.default_tree_depth,
            max_depth: config.max_tree_depth,
        }
    }

    /// Nested tree under `folder_id`, cut off below `max_depth` levels.
    ///
    /// Without `max_depth` the configured default depth applies. Requests
    /// deeper than the configured maximum are rejected. Built from a single
    /// read-locked view so the tree is consistent even while folders are
    /// being moved.
    pub async fn get_tree(&self, folder_id: FolderId, max_depth: Option<u32>) -> AppResult<FolderNode> {
        let depth = max_depth.unwrap_or(self.default_depth);
        if depth > self.max_depth {
            return Err(AppError::validation(format!(
                "max_depth must not exceed {}",
                self.max_depth
            )));
        }

        let index = self.hierarchy.snapshot().await;
        let folder = index.require(folder_id)?;
        build_tree(&index, folder, depth)
            .ok_or_else(|| AppError::internal("Folder tree construction produced no root"))
    }

    /// Folders from the root down to `folder_id`, both included.
    pub async fn get_breadcrumbs(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        let index = self.hierarchy.snapshot().await;
        let mut trail = vec![index.require(folder_id)?.clone()];
        for ancestor in index.ancestors(folder_id)? {
            if let Some(folder) = index.get(ancestor) {
                trail.push(folder.clone());
            }
        }
        trail.reverse();
        Ok(trail)
    }
}

type OpenNode<'a> = (FolderNode, std::vec::IntoIter<&'a Folder>);

/// Depth-first build on an explicit stack; a node is attached to its parent
/// once all of its own children are done.
fn build_tree(index: &FolderIndex, root: &Folder, max_depth: u32) -> Option<FolderNode> {
    let mut stack = vec![open_node(index, root, 0, max_depth)];
    let mut finished = None;

    while let Some((node, pending)) = stack.last_mut() {
        if let Some(child) = pending.next() {
            let depth = node.depth + 1;
            stack.push(open_node(index, child, depth, max_depth));
        } else if let Some((done, _)) = stack.pop() {
            match stack.last_mut() {
                Some((parent, _)) => parent.children.push(done),
                None => finished = Some(done),
            }
        }
    }
    finished
}

fn open_node<'a>(index: &'a FolderIndex, folder: &Folder, depth: u32, max_depth: u32) -> OpenNode<'a> {
    let pending = if depth >= max_depth {
        Vec::new()
    } else {
        index.children(folder.id).unwrap_or_default()
    };
    let node = FolderNode {
        id: folder.id,
        name: folder.name.clone(),
        depth,
        child_count: index.child_count(folder.id) as u64,
        children: Vec::with_capacity(pending.len()),
    };
    (node, pending.into_iter())
}
