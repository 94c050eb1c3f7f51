//! Embedded schema migrations.

use sqlx::PgPool;
use tracing::info;

use grchub_core::error::{AppError, ErrorKind};
use grchub_core::result::AppResult;

/// Apply every migration under `migrations/` that the database has not seen yet.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("Applying schema migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to apply migrations: {e}"),
                e,
            )
        })?;

    info!("Schema is up to date");
    Ok(())
}
