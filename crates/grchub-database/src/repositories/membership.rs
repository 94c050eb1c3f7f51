//! Group membership repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use grchub_core::error::{AppError, ErrorKind};
use grchub_core::result::AppResult;
use grchub_core::traits::Repository;
use grchub_core::types::{UserGroupId, UserId};
use grchub_entity::group::GroupMembership;

/// Rows of the `group_memberships` join table, keyed by `(user_id, user_group_id)`.
#[derive(Debug, Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<GroupMembership, (UserId, UserGroupId)> for PgMembershipRepository {
    async fn find_by_id(&self, id: &(UserId, UserGroupId)) -> AppResult<Option<GroupMembership>> {
        let (user_id, group_id) = id;
        sqlx::query_as::<_, GroupMembership>(
            "SELECT * FROM group_memberships WHERE user_id = $1 AND user_group_id = $2",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    async fn find_all(&self) -> AppResult<Vec<GroupMembership>> {
        sqlx::query_as::<_, GroupMembership>(
            "SELECT * FROM group_memberships ORDER BY created_at ASC, user_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load memberships", e))
    }

    async fn create(&self, membership: &GroupMembership) -> AppResult<GroupMembership> {
        sqlx::query_as::<_, GroupMembership>(
            "INSERT INTO group_memberships (user_id, user_group_id, created_at) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(membership.user_id)
        .bind(membership.user_group_id)
        .bind(membership.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict("User is already a member of this group")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create membership", e),
        })
    }

    async fn update(&self, membership: &GroupMembership) -> AppResult<GroupMembership> {
        self.find_by_id(&membership.key())
            .await?
            .ok_or_else(|| AppError::not_found("Membership not found"))
    }

    async fn delete(&self, id: &(UserId, UserGroupId)) -> AppResult<bool> {
        let (user_id, group_id) = id;
        let result = sqlx::query(
            "DELETE FROM group_memberships WHERE user_id = $1 AND user_group_id = $2",
        )
        .bind(user_id)
        .bind(group_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete membership", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM group_memberships")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count memberships", e)
            })?;
        Ok(total as u64)
    }
}
