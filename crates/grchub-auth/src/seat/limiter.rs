//! Seat cap enforcement.

use serde::{Deserialize, Serialize};
use tracing::warn;

use grchub_core::config::LicenseConfig;
use grchub_core::error::AppError;
use grchub_core::result::AppResult;
use grchub_entity::role::{Role, is_edit_capable};

/// Snapshot of editor seat usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStatus {
    /// Whether the cap is enforced.
    pub enforced: bool,
    /// Licensed editor seats.
    pub total_seats: u32,
    /// Users currently holding an edit-capable permission.
    pub used_seats: u32,
    /// Seats left before new editors are rejected.
    pub available_seats: u32,
}

/// Decides whether a grant may create new editors.
///
/// The limiter holds no state of its own; callers pass the current editor
/// count while holding whatever lock serializes their grants.
#[derive(Debug, Clone)]
pub struct SeatLimiter {
    enabled: bool,
    seats: u32,
    editor_prefixes: Vec<String>,
}

impl SeatLimiter {
    /// Build a limiter from license configuration.
    pub fn new(config: &LicenseConfig) -> Self {
        Self {
            enabled: config.enabled,
            seats: config.seats,
            editor_prefixes: config.editor_prefixes.clone(),
        }
    }

    /// A limiter that never rejects.
    pub fn unlimited() -> Self {
        Self::new(&LicenseConfig::default())
    }

    /// Whether `codename` makes its holder an editor.
    pub fn is_edit_permission(&self, codename: &str) -> bool {
        is_edit_capable(codename, &self.editor_prefixes)
    }

    /// Whether granting `role` makes its holder an editor.
    pub fn role_grants_edit(&self, role: &Role) -> bool {
        role.grants_edit(&self.editor_prefixes)
    }

    /// Reject a grant that would raise the editor count past the cap.
    ///
    /// `current_editors` counts users already holding edit rights;
    /// `new_editors` counts users the grant would turn into editors.
    /// A grant that creates no new editors always passes.
    pub fn check(&self, current_editors: usize, new_editors: usize) -> AppResult<()> {
        if !self.enabled || new_editors == 0 {
            return Ok(());
        }
        let seats = self.seats as usize;
        if current_editors + new_editors > seats {
            warn!(
                current_editors,
                new_editors,
                seats,
                "Editor grant rejected: license seats exhausted"
            );
            return Err(AppError::license_limit(format!(
                "License seat limit reached: {current_editors} of {seats} editor seats in use, \
                 grant needs {new_editors} more"
            )));
        }
        Ok(())
    }

    /// Report usage for `used` current editors.
    pub fn status(&self, used: usize) -> SeatStatus {
        let used_seats = u32::try_from(used).unwrap_or(u32::MAX);
        SeatStatus {
            enforced: self.enabled,
            total_seats: self.seats,
            used_seats,
            available_seats: self.seats.saturating_sub(used_seats),
        }
    }
}
