//! The owned, lock-protected folder hierarchy.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use grchub_core::error::AppError;
use grchub_core::result::AppResult;
use grchub_core::traits::{FolderScope, Repository};
use grchub_core::types::{FolderId, PageRequest, PageResponse};
use grchub_entity::folder::{CreateFolder, Folder};

use super::index::{FolderIndex, Reparent};

/// Longest accepted folder name, in characters.
const MAX_NAME_LEN: usize = 200;

/// Single owner of the folder tree.
///
/// Every mutation holds the write lock across validate, persist, and apply,
/// so readers never see a half-applied change and a storage failure leaves
/// the index untouched.
pub struct FolderHierarchy {
    index: RwLock<FolderIndex>,
    repo: Arc<dyn Repository<Folder, FolderId>>,
}

impl FolderHierarchy {
    /// Load every stored folder, creating the builtin root when storage is empty.
    ///
    /// A stored graph with no root, several roots, dangling parents, or a
    /// parent cycle is rejected with a `Configuration` error.
    pub async fn bootstrap(
        repo: Arc<dyn Repository<Folder, FolderId>>,
        root_name: &str,
    ) -> AppResult<Self> {
        let rows = repo.find_all().await?;
        let index = if rows.is_empty() {
            let root = repo.create(&Folder::new_root(root_name)).await?;
            info!(folder_id = %root.id, name = %root.name, "Created root folder");
            FolderIndex::new(root)
        } else {
            FolderIndex::from_folders(rows)?
        };

        info!(
            folders = index.len(),
            root_id = %index.root_id(),
            "Folder hierarchy loaded"
        );

        Ok(Self {
            index: RwLock::new(index),
            repo,
        })
    }

    /// Create a folder named `name` under `parent`, or under the root when `None`.
    pub async fn create_folder(&self, name: &str, parent: Option<FolderId>) -> AppResult<FolderId> {
        self.create_folder_with(CreateFolder::named(name, parent))
            .await
            .map(|folder| folder.id)
    }

    /// Create a folder from a full request.
    pub async fn create_folder_with(&self, data: CreateFolder) -> AppResult<Folder> {
        let name = normalize_name(&data.name)?;

        let mut index = self.index.write().await;
        let parent = index.check_create(data.parent_id)?;
        let folder = Folder::new_child(
            CreateFolder {
                name,
                description: data.description.filter(|d| !d.trim().is_empty()),
                parent_id: Some(parent),
            },
            parent,
        );

        let stored = self.repo.create(&folder).await?;
        index.insert(stored.clone());

        info!(
            folder_id = %stored.id,
            parent_id = %parent,
            name = %stored.name,
            "Folder created"
        );
        Ok(stored)
    }

    /// Move `id` under `new_parent`.
    ///
    /// Fails with `NotFound` for unknown ids, `ProtectedRoot` for the root,
    /// and `Cycle` when `new_parent` is `id` or one of its descendants.
    /// Moving a folder to its current parent succeeds without writing.
    pub async fn set_parent(&self, id: FolderId, new_parent: FolderId) -> AppResult<Folder> {
        let mut index = self.index.write().await;
        match index.check_reparent(id, new_parent)? {
            Reparent::Unchanged => {
                debug!(folder_id = %id, parent_id = %new_parent, "Folder already under parent");
                index.require(id).cloned()
            }
            Reparent::Move(parent) => {
                let mut folder = index.require(id)?.clone();
                let previous = folder.parent_id;
                folder.parent_id = Some(parent);
                folder.updated_at = Utc::now();

                let stored = self.repo.update(&folder).await?;
                index.replace(stored.clone());

                info!(
                    folder_id = %id,
                    from = ?previous,
                    to = %parent,
                    "Folder moved"
                );
                Ok(stored)
            }
        }
    }

    /// Change a folder's name and/or description. `None` keeps the current
    /// value; an empty description clears it. The root may be renamed.
    pub async fn rename_folder(
        &self,
        id: FolderId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<Folder> {
        let name = name.map(normalize_name).transpose()?;

        let mut index = self.index.write().await;
        let mut folder = index.require(id)?.clone();
        if name.is_none() && description.is_none() {
            return Ok(folder);
        }
        if let Some(name) = name {
            folder.name = name;
        }
        if let Some(description) = description {
            let description = description.trim();
            folder.description = (!description.is_empty()).then(|| description.to_string());
        }
        folder.updated_at = Utc::now();

        let stored = self.repo.update(&folder).await?;
        index.replace(stored.clone());

        info!(folder_id = %id, name = %stored.name, "Folder updated");
        Ok(stored)
    }

    /// Delete a childless, non-root folder and return the removed row.
    pub async fn delete_folder(&self, id: FolderId) -> AppResult<Folder> {
        let mut index = self.index.write().await;
        index.check_delete(id)?;

        if !self.repo.delete(&id).await? {
            warn!(folder_id = %id, "Folder row was already missing from storage");
        }
        let removed = index
            .remove(id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        info!(folder_id = %id, name = %removed.name, "Folder deleted");
        Ok(removed)
    }

    /// Every folder strictly below `id`.
    pub async fn get_descendants(&self, id: FolderId) -> AppResult<Vec<FolderId>> {
        self.index.read().await.descendants(id)
    }

    /// Parents of `id`, nearest first, root last.
    pub async fn get_ancestors(&self, id: FolderId) -> AppResult<Vec<FolderId>> {
        self.index.read().await.ancestors(id)
    }

    /// Fetch one folder.
    pub async fn get_folder(&self, id: FolderId) -> AppResult<Folder> {
        self.index.read().await.require(id).cloned()
    }

    /// The root folder.
    pub async fn root(&self) -> Folder {
        self.index.read().await.root().clone()
    }

    /// Direct children of `id`, sorted by name.
    pub async fn children(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let index = self.index.read().await;
        Ok(index.children(id)?.into_iter().cloned().collect())
    }

    /// One page of every folder, sorted by name.
    pub async fn list(&self, page: &PageRequest) -> PageResponse<Folder> {
        let index = self.index.read().await;
        let all: Vec<Folder> = index.sorted().into_iter().cloned().collect();
        PageResponse::from_ordered(all, page)
    }

    /// Whether `id` resolves to a folder.
    pub async fn contains(&self, id: FolderId) -> bool {
        self.index.read().await.contains(id)
    }

    /// Number of folders, root included.
    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    /// Whether the hierarchy is empty. Never true after bootstrap.
    pub async fn is_empty(&self) -> bool {
        self.index.read().await.is_empty()
    }

    /// Hold the read lock for a consistent multi-step read.
    pub async fn snapshot(&self) -> RwLockReadGuard<'_, FolderIndex> {
        self.index.read().await
    }
}

impl std::fmt::Debug for FolderHierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderHierarchy").finish_non_exhaustive()
    }
}

#[async_trait]
impl FolderScope for FolderHierarchy {
    async fn descendants(&self, folder: FolderId) -> AppResult<Vec<FolderId>> {
        self.get_descendants(folder).await
    }

    async fn ancestors(&self, folder: FolderId) -> AppResult<Vec<FolderId>> {
        self.get_ancestors(folder).await
    }

    async fn exists(&self, folder: FolderId) -> bool {
        self.contains(folder).await
    }
}

fn normalize_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Folder name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}
