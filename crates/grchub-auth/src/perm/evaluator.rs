//! Permission evaluation over the folder hierarchy.
//!
//! Rules:
//! - A grant on folder `F` always covers records stored in `F`.
//! - A recursive grant on `F` also covers every descendant of `F`.
//! - A non-recursive grant never reaches below `F`.

use std::collections::BTreeSet;
use std::sync::Arc;

use grchub_core::error::AppError;
use grchub_core::result::AppResult;
use grchub_core::traits::FolderScope;
use grchub_core::types::FolderId;

/// One role assignment as seen by a single user, with the role's permissions inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveGrant {
    /// Perimeter folder of the assignment.
    pub folder_id: FolderId,
    /// Whether the assignment reaches the folder's descendants.
    pub is_recursive: bool,
    /// Permission codenames of the assigned role.
    pub permissions: Vec<String>,
}

impl EffectiveGrant {
    fn carries(&self, codename: &str) -> bool {
        self.permissions.iter().any(|p| p == codename)
    }
}

/// Answers permission questions for a user's effective grants.
#[derive(Clone)]
pub struct PermissionEvaluator {
    scope: Arc<dyn FolderScope>,
}

impl PermissionEvaluator {
    /// Create an evaluator reading the hierarchy through `scope`.
    pub fn new(scope: Arc<dyn FolderScope>) -> Self {
        Self { scope }
    }

    /// Whether `grants` include `codename` on a record stored in `folder`.
    ///
    /// Fails with `NotFound` if `folder` does not exist.
    pub async fn has_permission(
        &self,
        grants: &[EffectiveGrant],
        codename: &str,
        folder: FolderId,
    ) -> AppResult<bool> {
        if !self.scope.exists(folder).await {
            return Err(AppError::not_found(format!("Folder {folder} not found")));
        }

        let relevant: Vec<&EffectiveGrant> = grants.iter().filter(|g| g.carries(codename)).collect();
        if relevant.iter().any(|g| g.folder_id == folder) {
            return Ok(true);
        }
        if !relevant.iter().any(|g| g.is_recursive) {
            return Ok(false);
        }

        let ancestors = self.scope.ancestors(folder).await?;
        Ok(relevant
            .iter()
            .filter(|g| g.is_recursive)
            .any(|g| ancestors.contains(&g.folder_id)))
    }

    /// Every folder on which `grants` include `codename`.
    pub async fn permitted_folders(
        &self,
        grants: &[EffectiveGrant],
        codename: &str,
    ) -> AppResult<BTreeSet<FolderId>> {
        let mut folders = BTreeSet::new();
        for grant in grants.iter().filter(|g| g.carries(codename)) {
            if !self.scope.exists(grant.folder_id).await {
                continue;
            }
            folders.insert(grant.folder_id);
            if grant.is_recursive {
                folders.extend(self.scope.descendants(grant.folder_id).await?);
            }
        }
        Ok(folders)
    }
}

impl std::fmt::Debug for PermissionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionEvaluator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use grchub_core::ErrorKind;

    use super::*;

    /// Fixed parent map standing in for the live hierarchy.
    struct StaticScope {
        parents: HashMap<FolderId, Option<FolderId>>,
    }

    #[async_trait]
    impl FolderScope for StaticScope {
        async fn descendants(&self, folder: FolderId) -> AppResult<Vec<FolderId>> {
            let mut out = Vec::new();
            let mut frontier = vec![folder];
            while let Some(current) = frontier.pop() {
                for (child, parent) in &self.parents {
                    if *parent == Some(current) {
                        out.push(*child);
                        frontier.push(*child);
                    }
                }
            }
            Ok(out)
        }

        async fn ancestors(&self, folder: FolderId) -> AppResult<Vec<FolderId>> {
            let mut out = Vec::new();
            let mut current = self.parents.get(&folder).copied().flatten();
            while let Some(parent) = current {
                out.push(parent);
                current = self.parents.get(&parent).copied().flatten();
            }
            Ok(out)
        }

        async fn exists(&self, folder: FolderId) -> bool {
            self.parents.contains_key(&folder)
        }
    }

    /// root -> a -> b, root -> c
    fn fixture() -> (PermissionEvaluator, [FolderId; 4]) {
        let [root, a, b, c] = [FolderId::new(), FolderId::new(), FolderId::new(), FolderId::new()];
        let parents = HashMap::from([
            (root, None),
            (a, Some(root)),
            (b, Some(a)),
            (c, Some(root)),
        ]);
        let evaluator = PermissionEvaluator::new(Arc::new(StaticScope { parents }));
        (evaluator, [root, a, b, c])
    }

    fn grant(folder_id: FolderId, is_recursive: bool) -> EffectiveGrant {
        EffectiveGrant {
            folder_id,
            is_recursive,
            permissions: vec!["view_asset".to_string()],
        }
    }

    #[tokio::test]
    async fn test_recursive_grant_covers_descendants() {
        let (evaluator, [_, a, b, c]) = fixture();
        let grants = [grant(a, true)];
        assert!(evaluator.has_permission(&grants, "view_asset", a).await.unwrap());
        assert!(evaluator.has_permission(&grants, "view_asset", b).await.unwrap());
        assert!(!evaluator.has_permission(&grants, "view_asset", c).await.unwrap());
    }

    #[tokio::test]
    async fn test_non_recursive_grant_stops_at_folder() {
        let (evaluator, [_, a, b, _]) = fixture();
        let grants = [grant(a, false)];
        assert!(evaluator.has_permission(&grants, "view_asset", a).await.unwrap());
        assert!(!evaluator.has_permission(&grants, "view_asset", b).await.unwrap());
    }

    #[tokio::test]
    async fn test_other_codename_is_not_granted() {
        let (evaluator, [root, ..]) = fixture();
        let grants = [grant(root, true)];
        assert!(!evaluator.has_permission(&grants, "change_asset", root).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_folder_is_not_found() {
        let (evaluator, [root, ..]) = fixture();
        let err = evaluator
            .has_permission(&[grant(root, true)], "view_asset", FolderId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_permitted_folders_unions_grants() {
        let (evaluator, [root, a, b, c]) = fixture();
        let folders = evaluator
            .permitted_folders(&[grant(a, true), grant(c, false)], "view_asset")
            .await
            .unwrap();
        assert_eq!(folders, BTreeSet::from([a, b, c]));
        assert!(!folders.contains(&root));
    }
}
