//! Editor seat licensing configuration.

use serde::{Deserialize, Serialize};

/// License configuration.
///
/// A seat is consumed by every user holding at least one edit-capable
/// permission. Read-only users are free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Whether the seat cap is enforced. When disabled, editors are unlimited.
    #[serde(default)]
    pub enabled: bool,
    /// Maximum number of editors.
    #[serde(default = "default_seats")]
    pub seats: u32,
    /// Permission codename prefixes that make a permission edit-capable.
    #[serde(default = "default_editor_prefixes")]
    pub editor_prefixes: Vec<String>,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seats: default_seats(),
            editor_prefixes: default_editor_prefixes(),
        }
    }
}

fn default_seats() -> u32 {
    10
}

fn default_editor_prefixes() -> Vec<String> {
    vec![
        "add_".to_string(),
        "change_".to_string(),
        "delete_".to_string(),
    ]
}
