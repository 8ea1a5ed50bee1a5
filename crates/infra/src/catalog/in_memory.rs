//! In-memory catalog for tests/dev.

use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;

use pharmacie_inventory::Item;
use pharmacie_replenishment::{CatalogRepository, StorageError};
use pharmacie_suppliers::Supplier;

/// JSON seed document: `{ "items": [...], "suppliers": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
}

/// Catalog held in memory. Reads return snapshots in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: RwLock<Vec<Item>>,
    suppliers: RwLock<Vec<Supplier>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(items: Vec<Item>, suppliers: Vec<Supplier>) -> Self {
        Self {
            items: RwLock::new(items),
            suppliers: RwLock::new(suppliers),
        }
    }

    /// Parse a JSON seed document. Item and supplier records are validated on
    /// the way in, as the Postgres adapter does.
    pub fn from_seed_json(json: &str) -> Result<Self, StorageError> {
        let seed: CatalogSeed =
            serde_json::from_str(json).map_err(|e| StorageError::Malformed(e.to_string()))?;
        Ok(Self::with_data(seed.items, seed.suppliers))
    }

    pub async fn from_seed_file(path: &Path) -> Result<Self, StorageError> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            StorageError::Unavailable(format!("cannot read seed {}: {e}", path.display()))
        })?;
        Self::from_seed_json(&json)
    }

    /// Replace the item catalog.
    pub fn replace_items(&self, items: Vec<Item>) -> Result<(), StorageError> {
        let mut guard = self.items.write().map_err(|_| poisoned())?;
        *guard = items;
        Ok(())
    }

    /// Replace the supplier directory.
    pub fn replace_suppliers(&self, suppliers: Vec<Supplier>) -> Result<(), StorageError> {
        let mut guard = self.suppliers.write().map_err(|_| poisoned())?;
        *guard = suppliers;
        Ok(())
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("in-memory catalog lock poisoned".to_string())
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn list_all_items(&self) -> Result<Vec<Item>, StorageError> {
        self.items.read().map(|i| i.clone()).map_err(|_| poisoned())
    }

    async fn list_all_suppliers_with_categories(&self) -> Result<Vec<Supplier>, StorageError> {
        self.suppliers.read().map(|s| s.clone()).map_err(|_| poisoned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEED: &str = r#"{
        "items": [
            {"id": 1, "name": "Aspirine", "category": {"code": 1, "label": "Antalgiques"}, "on_hand": 2, "threshold": 10},
            {"id": 2, "name": "Toplexil", "category": {"code": 2, "label": "Sirops"}, "on_hand": 8, "threshold": 3}
        ],
        "suppliers": [
            {"id": 1, "name": "AcmeCo", "email": "orders@acme.example",
             "categories": [{"code": 1, "label": "Antalgiques"}, {"code": 1, "label": "Antalgiques"}]}
        ]
    }"#;

    #[tokio::test]
    async fn seed_json_round_trips_through_repository() {
        let catalog = InMemoryCatalog::from_seed_json(SEED).unwrap();

        let items = catalog.list_all_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name(), "Aspirine");
        assert!(items[0].needs_resupply());

        let suppliers = catalog.list_all_suppliers_with_categories().await.unwrap();
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].categories().len(), 1);
    }

    #[test]
    fn invalid_supplier_in_seed_is_malformed() {
        let json = r#"{"suppliers": [{"id": 1, "name": "AcmeCo", "email": "nope"}]}"#;
        let err = InMemoryCatalog::from_seed_json(json).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(_)));
    }

    #[test]
    fn negative_stock_in_seed_is_malformed() {
        let json = r#"{"items": [{"id": 1, "name": "x", "category": {"code": 1, "label": "c"}, "on_hand": -1, "threshold": 1}]}"#;
        assert!(matches!(
            InMemoryCatalog::from_seed_json(json),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn blank_item_name_in_seed_is_malformed() {
        let json = r#"{"items": [{"id": 1, "name": "   ", "category": {"code": 1, "label": "c"}, "on_hand": 0, "threshold": 1}]}"#;
        let err = InMemoryCatalog::from_seed_json(json).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(msg) if msg.contains("item name cannot be empty")));
    }

    #[tokio::test]
    async fn seed_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let catalog = InMemoryCatalog::from_seed_file(file.path()).await.unwrap();
        assert_eq!(catalog.list_all_items().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_seed_file_is_unavailable() {
        let err = InMemoryCatalog::from_seed_file(Path::new("/nonexistent/seed.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[tokio::test]
    async fn replace_swaps_snapshot() {
        let catalog = InMemoryCatalog::from_seed_json(SEED).unwrap();
        catalog.replace_items(vec![]).unwrap();
        assert!(catalog.list_all_items().await.unwrap().is_empty());
    }
}
