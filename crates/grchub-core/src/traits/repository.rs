//! Generic repository trait for entity persistence.

use async_trait::async_trait;

use crate::result::AppResult;

/// Generic CRUD repository trait.
///
/// Each entity gets a strongly typed repository through the type
/// parameters. Both the PostgreSQL repositories and the in-memory backend
/// implement it, so services only ever hold an `Arc<dyn Repository<..>>`.
#[async_trait]
pub trait Repository<Entity, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<Entity>>;

    /// Load every stored entity.
    ///
    /// Used at startup to warm the in-process indexes, so implementations
    /// return rows in creation order.
    async fn find_all(&self) -> AppResult<Vec<Entity>>;

    /// Insert a new entity and return the stored version.
    async fn create(&self, entity: &Entity) -> AppResult<Entity>;

    /// Replace an existing entity and return the stored version.
    async fn update(&self, entity: &Entity) -> AppResult<Entity>;

    /// Delete an entity by its primary key. Returns `true` if a row was removed.
    async fn delete(&self, id: &Id) -> AppResult<bool>;

    /// Count stored entities.
    async fn count(&self) -> AppResult<u64>;
}
