//! In-process index of the folder tree.
//!
//! Folders only store a parent link. The index derives children from those
//! links through a map keyed by parent id and answers every structural
//! question by walking that map. It never touches storage; the owning
//! [`FolderHierarchy`](super::hierarchy::FolderHierarchy) validates against
//! the index, persists, and only then applies the change here.

use std::collections::{BTreeSet, HashMap, VecDeque};

use grchub_core::error::AppError;
use grchub_core::result::AppResult;
use grchub_core::types::FolderId;
use grchub_entity::folder::Folder;

/// Result of validating a reparent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reparent {
    /// The requested parent is already the current parent.
    Unchanged,
    /// The folder moves under the contained parent.
    Move(FolderId),
}

/// Folder rows plus the derived parent-to-children map.
#[derive(Debug, Clone)]
pub struct FolderIndex {
    root: FolderId,
    folders: HashMap<FolderId, Folder>,
    children: HashMap<FolderId, BTreeSet<FolderId>>,
}

impl FolderIndex {
    /// An index holding only `root`.
    pub fn new(root: Folder) -> Self {
        let id = root.id;
        Self {
            root: id,
            folders: HashMap::from([(id, root)]),
            children: HashMap::new(),
        }
    }

    /// Build an index from stored rows, rejecting any graph that is not a
    /// single tree hanging off exactly one root.
    pub fn from_folders(rows: Vec<Folder>) -> AppResult<Self> {
        let mut roots = rows.iter().filter(|f| f.is_root);
        let root = match (roots.next(), roots.next()) {
            (Some(root), None) => root.id,
            (None, _) => {
                return Err(AppError::configuration("Stored folders have no root folder"));
            }
            (Some(_), Some(_)) => {
                return Err(AppError::configuration(
                    "Stored folders have more than one root folder",
                ));
            }
        };

        let mut index = Self {
            root,
            folders: HashMap::with_capacity(rows.len()),
            children: HashMap::new(),
        };

        for folder in rows {
            if folder.is_root == folder.parent_id.is_some() {
                return Err(AppError::configuration(format!(
                    "Folder {} has an inconsistent root flag and parent",
                    folder.id
                )));
            }
            let id = folder.id;
            if index.folders.insert(id, folder).is_some() {
                return Err(AppError::configuration(format!("Folder {id} is stored twice")));
            }
        }

        let links: Vec<(FolderId, FolderId)> = index
            .folders
            .values()
            .filter_map(|f| f.parent_id.map(|parent| (parent, f.id)))
            .collect();
        for (parent, child) in links {
            if !index.folders.contains_key(&parent) {
                return Err(AppError::configuration(format!(
                    "Folder {child} references missing parent {parent}"
                )));
            }
            index.children.entry(parent).or_default().insert(child);
        }

        // A folder that does not reach the root sits on a parent cycle.
        let reachable = index.descendants(root)?.len() + 1;
        if reachable != index.folders.len() {
            return Err(AppError::configuration(format!(
                "Folder graph contains a cycle: {} folders do not reach the root",
                index.folders.len() - reachable
            )));
        }

        Ok(index)
    }

    /// Id of the root folder.
    pub fn root_id(&self) -> FolderId {
        self.root
    }

    /// The root folder.
    pub fn root(&self) -> &Folder {
        &self.folders[&self.root]
    }

    /// Look up a folder.
    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    /// Look up a folder, failing with `NotFound`.
    pub fn require(&self, id: FolderId) -> AppResult<&Folder> {
        self.folders
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Whether `id` resolves to a folder.
    pub fn contains(&self, id: FolderId) -> bool {
        self.folders.contains_key(&id)
    }

    /// Number of folders, root included.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Always false: the root is never removed.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Every folder, sorted by name.
    pub fn sorted(&self) -> Vec<&Folder> {
        let mut all: Vec<&Folder> = self.folders.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        all
    }

    /// Direct children of `id`, sorted by name.
    pub fn children(&self, id: FolderId) -> AppResult<Vec<&Folder>> {
        self.require(id)?;
        let mut kids: Vec<&Folder> = self
            .children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.folders.get(child))
            .collect();
        kids.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(kids)
    }

    /// Number of direct children of `id`.
    pub fn child_count(&self, id: FolderId) -> usize {
        self.children.get(&id).map_or(0, BTreeSet::len)
    }

    /// Every folder strictly below `id`, in breadth-first order.
    pub fn descendants(&self, id: FolderId) -> AppResult<Vec<FolderId>> {
        self.require(id)?;
        let mut found = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.get(&current) {
                for &kid in kids {
                    found.push(kid);
                    queue.push_back(kid);
                }
            }
        }
        Ok(found)
    }

    /// Parents of `id` from nearest to the root; empty for the root.
    pub fn ancestors(&self, id: FolderId) -> AppResult<Vec<FolderId>> {
        let mut chain = Vec::new();
        let mut current = self.require(id)?.parent_id;
        while let Some(parent) = current {
            if chain.len() >= self.folders.len() {
                return Err(AppError::internal(format!(
                    "Parent chain of folder {id} does not terminate"
                )));
            }
            chain.push(parent);
            current = self.folders.get(&parent).and_then(|f| f.parent_id);
        }
        Ok(chain)
    }

    /// Whether `ancestor` lies strictly above `id`.
    pub fn is_strict_ancestor(&self, ancestor: FolderId, id: FolderId) -> bool {
        let mut current = self.folders.get(&id).and_then(|f| f.parent_id);
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.folders.len() {
                return false;
            }
            current = self.folders.get(&parent).and_then(|f| f.parent_id);
        }
        false
    }

    /// Resolve the parent of a new folder; `None` means the root.
    pub fn check_create(&self, parent: Option<FolderId>) -> AppResult<FolderId> {
        match parent {
            Some(parent) => self.require(parent).map(|p| p.id),
            None => Ok(self.root),
        }
    }

    /// Validate moving `id` under `new_parent`.
    ///
    /// Checks run in a fixed order: unknown folder, root folder, unknown
    /// parent, unchanged parent, then cycle.
    pub fn check_reparent(&self, id: FolderId, new_parent: FolderId) -> AppResult<Reparent> {
        let folder = self.require(id)?;
        if folder.is_root || id == self.root {
            return Err(AppError::protected_root(
                "The root folder cannot be moved",
            ));
        }
        self.require(new_parent)?;
        if folder.parent_id == Some(new_parent) {
            return Ok(Reparent::Unchanged);
        }
        // new_parent in descendants(id) is the same as id being above new_parent.
        if new_parent == id || self.is_strict_ancestor(id, new_parent) {
            return Err(AppError::cycle(format!(
                "Moving folder {id} under {new_parent} would create a cycle"
            )));
        }
        Ok(Reparent::Move(new_parent))
    }

    /// Validate deleting `id`.
    pub fn check_delete(&self, id: FolderId) -> AppResult<()> {
        let folder = self.require(id)?;
        if folder.is_root || id == self.root {
            return Err(AppError::protected_root(
                "The root folder cannot be deleted",
            ));
        }
        let count = self.child_count(id);
        if count > 0 {
            return Err(AppError::has_children(format!(
                "Folder {id} still has {count} child folder(s)"
            )));
        }
        Ok(())
    }

    /// Add a validated, already persisted folder.
    pub fn insert(&mut self, folder: Folder) {
        if let Some(parent) = folder.parent_id {
            self.children.entry(parent).or_default().insert(folder.id);
        }
        self.folders.insert(folder.id, folder);
    }

    /// Replace a folder row, moving it in the children map if its parent changed.
    pub fn replace(&mut self, folder: Folder) {
        let id = folder.id;
        let new_parent = folder.parent_id;
        let old_parent = self.folders.insert(id, folder).and_then(|old| old.parent_id);
        if old_parent != new_parent {
            if let Some(old) = old_parent {
                self.unlink(old, id);
            }
            if let Some(new) = new_parent {
                self.children.entry(new).or_default().insert(id);
            }
        }
    }

    /// Drop a validated, already deleted folder.
    pub fn remove(&mut self, id: FolderId) -> Option<Folder> {
        let folder = self.folders.remove(&id)?;
        if let Some(parent) = folder.parent_id {
            self.unlink(parent, id);
        }
        self.children.remove(&id);
        Some(folder)
    }

    fn unlink(&mut self, parent: FolderId, child: FolderId) {
        if let Some(kids) = self.children.get_mut(&parent) {
            kids.remove(&child);
            if kids.is_empty() {
                self.children.remove(&parent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use grchub_core::ErrorKind;
    use grchub_entity::folder::CreateFolder;

    use super::*;

    fn add(index: &mut FolderIndex, name: &str, parent: Option<FolderId>) -> FolderId {
        let parent = index.check_create(parent).unwrap();
        let folder = Folder::new_child(CreateFolder::named(name, None), parent);
        let id = folder.id;
        index.insert(folder);
        id
    }

    fn reparent(index: &mut FolderIndex, id: FolderId, new_parent: FolderId) -> AppResult<()> {
        if let Reparent::Move(parent) = index.check_reparent(id, new_parent)? {
            let mut folder = index.require(id)?.clone();
            folder.parent_id = Some(parent);
            index.replace(folder);
        }
        Ok(())
    }

    /// R -> A -> B -> C
    fn chain() -> (FolderIndex, [FolderId; 4]) {
        let root = Folder::new_root("R");
        let r = root.id;
        let mut index = FolderIndex::new(root);
        let a = add(&mut index, "A", Some(r));
        let b = add(&mut index, "B", Some(a));
        let c = add(&mut index, "C", Some(b));
        (index, [r, a, b, c])
    }

    #[test]
    fn test_chain_scenario() {
        let (mut index, [r, a, b, c]) = chain();

        let err = reparent(&mut index, a, c).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cycle);

        reparent(&mut index, c, r).unwrap();
        assert_eq!(index.get(c).unwrap().parent_id, Some(r));
        assert_eq!(index.ancestors(b).unwrap(), vec![a, r]);

        let descendants: HashSet<FolderId> = index.descendants(r).unwrap().into_iter().collect();
        assert_eq!(descendants, HashSet::from([a, b, c]));
    }

    #[test]
    fn test_folder_is_not_its_own_descendant() {
        let (index, ids) = chain();
        for id in ids {
            assert!(!index.descendants(id).unwrap().contains(&id));
            assert!(!index.ancestors(id).unwrap().contains(&id));
        }
    }

    #[test]
    fn test_ancestors_end_at_root() {
        let (index, [r, a, b, c]) = chain();
        assert_eq!(index.ancestors(c).unwrap(), vec![b, a, r]);
        assert!(index.ancestors(r).unwrap().is_empty());
    }

    #[test]
    fn test_reparent_under_self_is_cycle() {
        let (mut index, [_, a, ..]) = chain();
        let err = reparent(&mut index, a, a).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cycle);
    }

    #[test]
    fn test_reparent_to_current_parent_is_noop() {
        let (index, [_, a, b, _]) = chain();
        assert_eq!(index.check_reparent(b, a).unwrap(), Reparent::Unchanged);
    }

    #[test]
    fn test_root_is_protected_whatever_the_target() {
        let (index, [r, a, ..]) = chain();
        for target in [a, r, FolderId::new()] {
            let err = index.check_reparent(r, target).unwrap_err();
            assert_eq!(err.kind, ErrorKind::ProtectedRoot);
        }
        assert_eq!(index.check_delete(r).unwrap_err().kind, ErrorKind::ProtectedRoot);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let (index, [_, a, ..]) = chain();
        let ghost = FolderId::new();
        assert_eq!(index.check_reparent(ghost, a).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(index.check_reparent(a, ghost).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(index.check_create(Some(ghost)).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(index.check_delete(ghost).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(index.descendants(ghost).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(index.ancestors(ghost).unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_requires_no_children() {
        let (mut index, [_, a, b, c]) = chain();
        assert_eq!(index.check_delete(b).unwrap_err().kind, ErrorKind::HasChildren);
        index.check_delete(c).unwrap();
        index.remove(c);
        assert!(!index.contains(c));
        assert_eq!(index.child_count(b), 0);
        index.check_delete(b).unwrap();
        assert_eq!(index.check_delete(a).unwrap_err().kind, ErrorKind::HasChildren);
    }

    #[test]
    fn test_missing_parent_attaches_under_root() {
        let (mut index, [r, ..]) = chain();
        let orphan = add(&mut index, "Orphan", None);
        assert_eq!(index.get(orphan).unwrap().parent_id, Some(r));
        let names: Vec<&str> = index.children(r).unwrap().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Orphan"]);
    }

    #[test]
    fn test_from_folders_accepts_tree() {
        let (index, [r, a, b, c]) = chain();
        let rows: Vec<Folder> = index.folders.values().cloned().collect();
        let rebuilt = FolderIndex::from_folders(rows).unwrap();
        assert_eq!(rebuilt.root_id(), r);
        assert_eq!(rebuilt.ancestors(c).unwrap(), vec![b, a, r]);
    }

    #[test]
    fn test_from_folders_rejects_cycle() {
        let (index, [_, a, _, c]) = chain();
        let mut rows: Vec<Folder> = index.folders.values().cloned().collect();
        // Detach A from the root and hang it under C: A -> B -> C -> A.
        for row in rows.iter_mut().filter(|f| f.id == a) {
            row.parent_id = Some(c);
        }
        let err = FolderIndex::from_folders(rows).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_from_folders_rejects_two_roots() {
        let rows = vec![Folder::new_root("One"), Folder::new_root("Two")];
        let err = FolderIndex::from_folders(rows).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_from_folders_rejects_dangling_parent() {
        let root = Folder::new_root("R");
        let stray = Folder::new_child(CreateFolder::named("Stray", None), FolderId::new());
        let err = FolderIndex::from_folders(vec![root, stray]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
