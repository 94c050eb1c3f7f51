//! User group repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use grchub_core::error::{AppError, ErrorKind};
use grchub_core::result::AppResult;
use grchub_core::traits::Repository;
use grchub_core::types::UserGroupId;
use grchub_entity::group::UserGroup;

/// Group rows in the `user_groups` table.
#[derive(Debug, Clone)]
pub struct PgUserGroupRepository {
    pool: PgPool,
}

impl PgUserGroupRepository {
    /// Create a new user group repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<UserGroup, UserGroupId> for PgUserGroupRepository {
    async fn find_by_id(&self, id: &UserGroupId) -> AppResult<Option<UserGroup>> {
        sqlx::query_as::<_, UserGroup>("SELECT * FROM user_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user group", e))
    }

    async fn find_all(&self) -> AppResult<Vec<UserGroup>> {
        sqlx::query_as::<_, UserGroup>("SELECT * FROM user_groups ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load user groups", e)
            })
    }

    async fn create(&self, group: &UserGroup) -> AppResult<UserGroup> {
        sqlx::query_as::<_, UserGroup>(
            "INSERT INTO user_groups (id, name, folder_id, builtin, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(group.folder_id)
        .bind(group.builtin)
        .bind(group.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create user group", e))
    }

    async fn update(&self, group: &UserGroup) -> AppResult<UserGroup> {
        sqlx::query_as::<_, UserGroup>(
            "UPDATE user_groups SET name = $2, folder_id = $3 WHERE id = $1 RETURNING *",
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(group.folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user group", e))?
        .ok_or_else(|| AppError::not_found(format!("User group {} not found", group.id)))
    }

    async fn delete(&self, id: &UserGroupId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete user group", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_groups")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count user groups", e)
            })?;
        Ok(total as u64)
    }
}
