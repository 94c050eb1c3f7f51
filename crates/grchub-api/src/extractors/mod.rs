//! Custom Axum extractors.

pub mod context;
pub mod json;
pub mod pagination;
pub mod path;

pub use context::Caller;
pub use json::ValidatedJson;
pub use pagination::PaginationParams;
pub use path::IdPath;
