//! Folder-scoped permission evaluation.

pub mod evaluator;

pub use evaluator::{EffectiveGrant, PermissionEvaluator};
