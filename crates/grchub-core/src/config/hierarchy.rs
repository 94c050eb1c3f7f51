//! Folder hierarchy configuration.

use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_tree_depth`.
///
/// Each tree level adds two levels of JSON nesting, and common JSON parsers
/// refuse documents nested deeper than 128.
pub const TREE_DEPTH_CEILING: u32 = 60;

/// Settings used when bootstrapping the folder hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Name given to the builtin root folder when it is first created.
    #[serde(default = "default_root_folder_name")]
    pub root_folder_name: String,
    /// Depth a folder tree is cut at when the caller gives no `max_depth`.
    #[serde(default = "default_tree_depth")]
    pub default_tree_depth: u32,
    /// Largest `max_depth` a caller may request.
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: u32,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            root_folder_name: default_root_folder_name(),
            default_tree_depth: default_tree_depth(),
            max_tree_depth: default_max_tree_depth(),
        }
    }
}

fn default_root_folder_name() -> String {
    "Global".to_string()
}

fn default_tree_depth() -> u32 {
    10
}

fn default_max_tree_depth() -> u32 {
    32
}
