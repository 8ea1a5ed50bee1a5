//! Inventory domain module: stock items, categories, and the resupply selection rules.
//!
//! This crate contains business rules for inventory, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod analyzer;
pub mod grouping;
pub mod item;

pub use analyzer::select_needing_resupply;
pub use grouping::{group_by_category, ResupplyGroups};
pub use item::{Category, Item, ItemRecord};
