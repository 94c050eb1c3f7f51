//! GRC Hub Server: folder-scoped access control with licensed editor seats.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use grchub_core::config::{AppConfig, DatabaseProvider};
use grchub_core::error::AppError;
use grchub_database::{DatabasePool, Repositories};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `GRCHUB_ENV` overlay, and `GRCHUB__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("GRCHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting GRC Hub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Persistence backend ──────────────────────────────
    let (repos, pool) = match config.database.provider {
        DatabaseProvider::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = DatabasePool::open(&config.database).await?;
            (Repositories::postgres(&pool), Some(pool))
        }
        DatabaseProvider::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            (Repositories::memory(), None)
        }
    };

    // ── Step 2: Hierarchy, IAM, and seat limiter ─────────────────
    let state = grchub_api::build_state(config, repos).await?;

    // ── Step 3: Serve ────────────────────────────────────────────
    let result = grchub_api::run_server(state).await;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    result
}
