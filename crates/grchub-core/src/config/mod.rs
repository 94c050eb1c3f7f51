//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every section falls back to its defaults when absent.

pub mod app;
pub mod database;
pub mod hierarchy;
pub mod license;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::hierarchy::{HierarchyConfig, TREE_DEPTH_CEILING};
pub use self::license::LicenseConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML files
/// (`config/default.toml` + environment overlay) and `GRCHUB__*` variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence backend settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Editor seat licensing.
    #[serde(default)]
    pub license: LicenseConfig,
    /// Folder hierarchy bootstrap settings.
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default`, then `config/{env}`, then environment
    /// variables prefixed with `GRCHUB` (`GRCHUB__LICENSE__SEATS=10`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GRCHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject combinations that cannot start a server.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.provider == DatabaseProvider::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.provider = \"postgres\"",
            ));
        }
        if self.hierarchy.root_folder_name.trim().is_empty() {
            return Err(AppError::configuration(
                "hierarchy.root_folder_name must not be empty",
            ));
        }
        let hierarchy = &self.hierarchy;
        if hierarchy.max_tree_depth == 0 || hierarchy.max_tree_depth > TREE_DEPTH_CEILING {
            return Err(AppError::configuration(format!(
                "hierarchy.max_tree_depth must be between 1 and {TREE_DEPTH_CEILING}"
            )));
        }
        if hierarchy.default_tree_depth > hierarchy.max_tree_depth {
            return Err(AppError::configuration(
                "hierarchy.default_tree_depth must not exceed hierarchy.max_tree_depth",
            ));
        }
        Ok(())
    }
}
