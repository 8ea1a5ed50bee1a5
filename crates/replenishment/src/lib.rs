//! Replenishment run: analyze → group → match → compose → dispatch → summary.
//!
//! This crate owns the orchestration and the storage seam it reads from. It
//! holds no state between runs.

pub mod coordinator;
pub mod repository;
pub mod summary;

pub use coordinator::{RunCoordinator, RunError};
pub use repository::{CatalogRepository, StorageError};
pub use summary::{RunOutcome, RunSummary, SupplierDetail};
