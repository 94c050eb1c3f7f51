//! Role assignment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use grchub_core::error::{AppError, ErrorKind};
use grchub_core::result::AppResult;
use grchub_core::traits::Repository;
use grchub_core::types::RoleAssignmentId;
use grchub_entity::role::RoleAssignment;

/// Rows of the `role_assignments` table.
#[derive(Debug, Clone)]
pub struct PgRoleAssignmentRepository {
    pool: PgPool,
}

impl PgRoleAssignmentRepository {
    /// Create a new role assignment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<RoleAssignment, RoleAssignmentId> for PgRoleAssignmentRepository {
    async fn find_by_id(&self, id: &RoleAssignmentId) -> AppResult<Option<RoleAssignment>> {
        sqlx::query_as::<_, RoleAssignment>("SELECT * FROM role_assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find role assignment", e)
            })
    }

    async fn find_all(&self) -> AppResult<Vec<RoleAssignment>> {
        sqlx::query_as::<_, RoleAssignment>(
            "SELECT * FROM role_assignments ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load role assignments", e)
        })
    }

    async fn create(&self, assignment: &RoleAssignment) -> AppResult<RoleAssignment> {
        sqlx::query_as::<_, RoleAssignment>(
            "INSERT INTO role_assignments \
             (id, role_id, user_id, user_group_id, folder_id, is_recursive, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(assignment.id)
        .bind(assignment.role_id)
        .bind(assignment.user_id)
        .bind(assignment.user_group_id)
        .bind(assignment.folder_id)
        .bind(assignment.is_recursive)
        .bind(assignment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create role assignment", e)
        })
    }

    async fn update(&self, assignment: &RoleAssignment) -> AppResult<RoleAssignment> {
        sqlx::query_as::<_, RoleAssignment>(
            "UPDATE role_assignments SET role_id = $2, folder_id = $3, is_recursive = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(assignment.id)
        .bind(assignment.role_id)
        .bind(assignment.folder_id)
        .bind(assignment.is_recursive)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update role assignment", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Role assignment {} not found", assignment.id)))
    }

    async fn delete(&self, id: &RoleAssignmentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM role_assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete role assignment", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM role_assignments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count role assignments", e)
            })?;
        Ok(total as u64)
    }
}
