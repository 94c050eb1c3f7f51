//! Convenience result type alias for GRC Hub.

use crate::error::AppError;

/// A specialized `Result` type for GRC Hub operations.
pub type AppResult<T> = Result<T, AppError>;
