//! Folder operations as exposed to the HTTP layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use grchub_core::error::AppError;
use grchub_core::result::AppResult;
use grchub_core::types::{FolderId, PageRequest, PageResponse};
use grchub_entity::folder::{CreateFolder, Folder};

use crate::context::RequestContext;
use crate::iam::IamService;

use super::hierarchy::FolderHierarchy;

/// Partial update of a folder. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolder {
    /// New name.
    pub name: Option<String>,
    /// New description; an empty string clears it.
    pub description: Option<String>,
    /// New parent.
    pub parent_id: Option<FolderId>,
}

/// Folder CRUD on top of the hierarchy, with reference checks on delete.
#[derive(Debug, Clone)]
pub struct FolderService {
    hierarchy: Arc<FolderHierarchy>,
    iam: Arc<IamService>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(hierarchy: Arc<FolderHierarchy>, iam: Arc<IamService>) -> Self {
        Self { hierarchy, iam }
    }

    /// Create a folder; a missing parent means the root.
    pub async fn create(&self, ctx: &RequestContext, data: CreateFolder) -> AppResult<Folder> {
        let folder = self.hierarchy.create_folder_with(data).await?;
        info!(
            request_id = %ctx.request_id,
            actor = ?ctx.actor,
            folder_id = %folder.id,
            "Folder created via API"
        );
        Ok(folder)
    }

    /// Fetch one folder.
    pub async fn get(&self, id: FolderId) -> AppResult<Folder> {
        self.hierarchy.get_folder(id).await
    }

    /// One page of all folders, sorted by name.
    pub async fn list(&self, page: &PageRequest) -> PageResponse<Folder> {
        self.hierarchy.list(page).await
    }

    /// Direct children, sorted by name.
    pub async fn children(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        self.hierarchy.children(id).await
    }

    /// Every folder below `id`, breadth first.
    pub async fn descendants(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let index = self.hierarchy.snapshot().await;
        Ok(index
            .descendants(id)?
            .into_iter()
            .filter_map(|d| index.get(d).cloned())
            .collect())
    }

    /// Parents of `id`, nearest first.
    pub async fn ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let index = self.hierarchy.snapshot().await;
        Ok(index
            .ancestors(id)?
            .into_iter()
            .filter_map(|a| index.get(a).cloned())
            .collect())
    }

    /// Apply a partial update. The move runs first, then the rename; each
    /// step commits on its own.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        data: UpdateFolder,
    ) -> AppResult<Folder> {
        if data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        let mut folder = match data.parent_id {
            Some(parent) => self.hierarchy.set_parent(id, parent).await?,
            None => self.hierarchy.get_folder(id).await?,
        };
        if data.name.is_some() || data.description.is_some() {
            folder = self
                .hierarchy
                .rename_folder(id, data.name.as_deref(), data.description.as_deref())
                .await?;
        }

        info!(
            request_id = %ctx.request_id,
            actor = ?ctx.actor,
            folder_id = %id,
            "Folder updated via API"
        );
        Ok(folder)
    }

    /// Delete a childless, unreferenced, non-root folder.
    pub async fn delete(&self, ctx: &RequestContext, id: FolderId) -> AppResult<Folder> {
        self.iam.delete_unreferenced_folder(ctx, id).await
    }
}
