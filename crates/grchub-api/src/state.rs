//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use grchub_core::config::AppConfig;
use grchub_service::{FolderHierarchy, FolderService, IamService, TreeService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ──
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the server started
    pub started_at: Instant,

    // ── Domain ──
    /// The folder tree
    pub hierarchy: Arc<FolderHierarchy>,
    /// Users, roles, groups, assignments, seats
    pub iam: Arc<IamService>,

    // ── Services ──
    /// Folder CRUD facade
    pub folder_service: Arc<FolderService>,
    /// Tree and breadcrumb views
    pub tree_service: Arc<TreeService>,
}

impl AppState {
    /// Wire services around an already loaded hierarchy and IAM service.
    pub fn new(config: AppConfig, hierarchy: Arc<FolderHierarchy>, iam: Arc<IamService>) -> Self {
        let tree_service = TreeService::new(hierarchy.clone(), &config.hierarchy);
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            folder_service: Arc::new(FolderService::new(hierarchy.clone(), iam.clone())),
            tree_service: Arc::new(tree_service),
            hierarchy,
            iam,
        }
    }
}
