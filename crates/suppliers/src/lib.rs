//! Supplier domain module: supplier records, the supplier directory, and the
//! rule that matches supplier capabilities against pending resupply groups.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod directory;
pub mod matcher;
pub mod supplier;

pub use directory::SupplierDirectory;
pub use matcher::{match_supplier, match_suppliers, CategoryLines, MatchedSupplier};
pub use supplier::Supplier;
