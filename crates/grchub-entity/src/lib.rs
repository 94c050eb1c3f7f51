//! # grchub-entity
//!
//! Domain entity models for GRC Hub. Every struct here is either a
//! database row (deriving `sqlx::FromRow`) or a value object built from
//! rows, such as the nested [`folder::FolderNode`] tree.

pub mod folder;
pub mod group;
pub mod role;
pub mod user;
