//! Read-only catalog access (items + supplier directory).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use pharmacie_inventory::Item;
use pharmacie_suppliers::Supplier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be reached or queried.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store answered with data the domain cannot accept.
    #[error("malformed catalog data: {0}")]
    Malformed(String),
}

/// Source of the catalog and supplier directory for a run.
///
/// Suppliers must come back with their serviced categories fully loaded;
/// matching never goes back to storage.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_all_items(&self) -> Result<Vec<Item>, StorageError>;

    async fn list_all_suppliers_with_categories(&self) -> Result<Vec<Supplier>, StorageError>;
}

#[async_trait]
impl<R> CatalogRepository for Arc<R>
where
    R: CatalogRepository + ?Sized,
{
    async fn list_all_items(&self) -> Result<Vec<Item>, StorageError> {
        (**self).list_all_items().await
    }

    async fn list_all_suppliers_with_categories(&self) -> Result<Vec<Supplier>, StorageError> {
        (**self).list_all_suppliers_with_categories().await
    }
}
