//! Process-local repository backend.
//!
//! Rows live in a `HashMap` behind a Tokio `RwLock`. A monotonically
//! increasing sequence number is stored with each row so `find_all`
//! returns rows in insertion order, like `ORDER BY created_at` does in
//! PostgreSQL.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use grchub_core::error::AppError;
use grchub_core::result::AppResult;
use grchub_core::traits::Repository;

#[derive(Debug)]
struct Rows<E, Id> {
    next_seq: u64,
    rows: HashMap<Id, (u64, E)>,
}

/// In-memory [`Repository`] keyed by a function of the entity.
pub struct MemoryRepository<E, Id> {
    entity: &'static str,
    key: fn(&E) -> Id,
    state: Arc<RwLock<Rows<E, Id>>>,
}

impl<E, Id> MemoryRepository<E, Id> {
    /// Create an empty repository. `entity` names the row type in error messages.
    pub fn new(entity: &'static str, key: fn(&E) -> Id) -> Self {
        Self {
            entity,
            key,
            state: Arc::new(RwLock::new(Rows {
                next_seq: 0,
                rows: HashMap::new(),
            })),
        }
    }
}

impl<E, Id> Clone for MemoryRepository<E, Id> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity,
            key: self.key,
            state: Arc::clone(&self.state),
        }
    }
}

impl<E, Id> fmt::Debug for MemoryRepository<E, Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<E, Id> Repository<E, Id> for MemoryRepository<E, Id>
where
    E: Clone + Send + Sync + 'static,
    Id: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<E>> {
        let state = self.state.read().await;
        Ok(state.rows.get(id).map(|(_, e)| e.clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        let state = self.state.read().await;
        let mut rows: Vec<&(u64, E)> = state.rows.values().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, e)| e.clone()).collect())
    }

    async fn create(&self, entity: &E) -> AppResult<E> {
        let id = (self.key)(entity);
        let mut state = self.state.write().await;
        if state.rows.contains_key(&id) {
            return Err(AppError::conflict(format!(
                "{} {id:?} already exists",
                self.entity
            )));
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.rows.insert(id, (seq, entity.clone()));
        Ok(entity.clone())
    }

    async fn update(&self, entity: &E) -> AppResult<E> {
        let id = (self.key)(entity);
        let mut state = self.state.write().await;
        match state.rows.get_mut(&id) {
            Some((_, row)) => {
                *row = entity.clone();
                Ok(entity.clone())
            }
            None => Err(AppError::not_found(format!(
                "{} {id:?} not found",
                self.entity
            ))),
        }
    }

    async fn delete(&self, id: &Id) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.rows.remove(id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state.rows.len() as u64)
    }
}
