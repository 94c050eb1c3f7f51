//! Read-only view of the folder hierarchy for permission scoping.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::FolderId;

/// Subtree queries a permission evaluator needs from the folder hierarchy.
///
/// A grant that is recursive on folder `F` covers a record stored in
/// folder `G` iff `G == F` or `G` is in `descendants(F)`.
#[async_trait]
pub trait FolderScope: Send + Sync + 'static {
    /// Every folder strictly below `folder`.
    async fn descendants(&self, folder: FolderId) -> AppResult<Vec<FolderId>>;

    /// Parents of `folder`, nearest first, ending with the root.
    async fn ancestors(&self, folder: FolderId) -> AppResult<Vec<FolderId>>;

    /// Whether `folder` currently resolves to a live folder.
    async fn exists(&self, folder: FolderId) -> bool;
}
