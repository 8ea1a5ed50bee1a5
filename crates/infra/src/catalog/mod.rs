//! Catalog storage adapters.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use pharmacie_inventory::Item;
use pharmacie_replenishment::{CatalogRepository, StorageError};
use pharmacie_suppliers::Supplier;

use crate::config::AppConfig;

pub mod in_memory;
pub mod postgres;

pub use in_memory::{CatalogSeed, InMemoryCatalog};
pub use postgres::PostgresCatalog;

/// Catalog backend selected once at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredCatalog {
    InMemory(Arc<InMemoryCatalog>),
    Postgres(PostgresCatalog),
}

impl ConfiguredCatalog {
    /// Postgres when `DATABASE_URL` is set, otherwise an in-memory catalog
    /// (seeded from `CATALOG_SEED_PATH` if given).
    pub async fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        if let Some(url) = &config.database_url {
            info!("using postgres catalog");
            return Ok(Self::Postgres(PostgresCatalog::connect(url).await?));
        }

        let catalog = match &config.catalog_seed_path {
            Some(path) => {
                info!(path = %path.display(), "using in-memory catalog seeded from file");
                InMemoryCatalog::from_seed_file(path).await?
            }
            None => {
                info!("using empty in-memory catalog");
                InMemoryCatalog::new()
            }
        };
        Ok(Self::InMemory(Arc::new(catalog)))
    }
}

#[async_trait]
impl CatalogRepository for ConfiguredCatalog {
    async fn list_all_items(&self) -> Result<Vec<Item>, StorageError> {
        match self {
            Self::InMemory(c) => c.list_all_items().await,
            Self::Postgres(c) => c.list_all_items().await,
        }
    }

    async fn list_all_suppliers_with_categories(&self) -> Result<Vec<Supplier>, StorageError> {
        match self {
            Self::InMemory(c) => c.list_all_suppliers_with_categories().await,
            Self::Postgres(c) => c.list_all_suppliers_with_categories().await,
        }
    }
}
