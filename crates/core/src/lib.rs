//! `pharmacie-core`: shared building blocks for the replenishment workspace.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CategoryCode, ItemId, RunId, SupplierId};
