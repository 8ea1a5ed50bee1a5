//! Postgres-backed catalog.
//!
//! Reads the pharmacy schema (managed elsewhere):
//!
//! | table                    | columns used                                                          |
//! |--------------------------|-----------------------------------------------------------------------|
//! | `categorie`              | `code`, `libelle`                                                     |
//! | `medicament`             | `reference`, `nom`, `unites_en_stock`, `niveau_de_reappro`, `categorie_code` |
//! | `fournisseur`            | `id`, `nom`, `email`                                                  |
//! | `fournisseur_categories` | `fournisseur_id`, `categorie_code`                                    |
//!
//! Suppliers are loaded eagerly: one query for supplier rows, one for every
//! supplier/category link, stitched together in memory. Nothing is fetched
//! lazily during matching. Integer columns are cast in SQL so either `INTEGER`
//! or `BIGINT` keys decode.
//!
//! ## Error Mapping
//!
//! | Failure                                   | StorageError  |
//! |-------------------------------------------|---------------|
//! | connection / query / pool errors          | `Unavailable` |
//! | undecodable column                        | `Malformed`   |
//! | negative quantity, dangling category link | `Malformed`   |
//! | row rejected by domain validation         | `Malformed`   |

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{FromRow, Row};
use tracing::{debug, instrument};

use pharmacie_core::{CategoryCode, ItemId, SupplierId};
use pharmacie_inventory::{Category, Item};
use pharmacie_replenishment::{CatalogRepository, StorageError};
use pharmacie_suppliers::Supplier;

const MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalog {
    #[instrument(skip(self))]
    async fn list_all_items(&self) -> Result<Vec<Item>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT
                m.reference::BIGINT AS reference,
                m.nom,
                m.unites_en_stock::INTEGER AS unites_en_stock,
                m.niveau_de_reappro::INTEGER AS niveau_de_reappro,
                m.categorie_code::BIGINT AS categorie_code,
                c.libelle AS categorie_libelle
            FROM medicament m
            LEFT JOIN categorie c ON c.code = m.categorie_code
            ORDER BY m.reference ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_all_items", e))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let row = ItemRow::from_row(&row).map_err(decode_error)?;
            items.push(row.into_item()?);
        }

        debug!(count = items.len(), "loaded items");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn list_all_suppliers_with_categories(&self) -> Result<Vec<Supplier>, StorageError> {
        let supplier_rows = sqlx::query(
            r#"
            SELECT id::BIGINT AS id, nom, email
            FROM fournisseur
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_suppliers", e))?;

        let link_rows = sqlx::query(
            r#"
            SELECT
                fc.fournisseur_id::BIGINT AS fournisseur_id,
                fc.categorie_code::BIGINT AS categorie_code,
                c.libelle AS categorie_libelle
            FROM fournisseur_categories fc
            LEFT JOIN categorie c ON c.code = fc.categorie_code
            ORDER BY fc.fournisseur_id ASC, fc.categorie_code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_supplier_categories", e))?;

        let suppliers = supplier_rows
            .iter()
            .map(|row| SupplierRow::from_row(row).map_err(decode_error))
            .collect::<Result<Vec<_>, _>>()?;
        let links = link_rows
            .iter()
            .map(|row| LinkRow::from_row(row).map_err(decode_error))
            .collect::<Result<Vec<_>, _>>()?;
        let suppliers = assemble_suppliers(suppliers, links)?;

        debug!(count = suppliers.len(), "loaded suppliers");
        Ok(suppliers)
    }
}

/// Attach each supplier's category links, keeping link order per supplier.
///
/// Suppliers come back fully populated; a link to an unknown category or a
/// supplier rejected by domain validation makes the whole load `Malformed`.
fn assemble_suppliers(
    suppliers: Vec<SupplierRow>,
    links: Vec<LinkRow>,
) -> Result<Vec<Supplier>, StorageError> {
    let mut categories_by_supplier: HashMap<i64, Vec<Category>> = HashMap::new();
    for link in links {
        let label = link.categorie_libelle.ok_or_else(|| {
            StorageError::Malformed(format!(
                "supplier {} references unknown category {}",
                link.fournisseur_id, link.categorie_code
            ))
        })?;
        categories_by_supplier
            .entry(link.fournisseur_id)
            .or_default()
            .push(Category::new(CategoryCode::new(link.categorie_code), label));
    }

    suppliers
        .into_iter()
        .map(|row| {
            let categories = categories_by_supplier.remove(&row.id).unwrap_or_default();
            Supplier::new(SupplierId::new(row.id), row.nom, row.email, categories)
                .map_err(|e| StorageError::Malformed(format!("supplier {}: {e}", row.id)))
        })
        .collect()
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            StorageError::Malformed(format!("{operation}: {err}"))
        }
        sqlx::Error::PoolClosed => {
            StorageError::Unavailable(format!("connection pool closed in {operation}"))
        }
        other => StorageError::Unavailable(format!("sqlx error in {operation}: {other}")),
    }
}

fn decode_error(err: sqlx::Error) -> StorageError {
    map_sqlx_error("decode_row", err)
}

// SQLx row types

#[derive(Debug)]
struct ItemRow {
    reference: i64,
    nom: String,
    unites_en_stock: i32,
    niveau_de_reappro: i32,
    categorie_code: i64,
    categorie_libelle: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for ItemRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ItemRow {
            reference: row.try_get("reference")?,
            nom: row.try_get("nom")?,
            unites_en_stock: row.try_get("unites_en_stock")?,
            niveau_de_reappro: row.try_get("niveau_de_reappro")?,
            categorie_code: row.try_get("categorie_code")?,
            categorie_libelle: row.try_get("categorie_libelle")?,
        })
    }
}

impl ItemRow {
    fn into_item(self) -> Result<Item, StorageError> {
        let label = self.categorie_libelle.ok_or_else(|| {
            StorageError::Malformed(format!(
                "item {} references unknown category {}",
                self.reference, self.categorie_code
            ))
        })?;
        let on_hand = non_negative(self.reference, "unites_en_stock", self.unites_en_stock)?;
        let threshold = non_negative(self.reference, "niveau_de_reappro", self.niveau_de_reappro)?;

        Item::new(
            ItemId::new(self.reference),
            self.nom,
            Category::new(CategoryCode::new(self.categorie_code), label),
            on_hand,
            threshold,
        )
        .map_err(|e| StorageError::Malformed(format!("item {}: {e}", self.reference)))
    }
}

fn non_negative(reference: i64, column: &str, value: i32) -> Result<u32, StorageError> {
    u32::try_from(value).map_err(|_| {
        StorageError::Malformed(format!("item {reference}: {column} is negative ({value})"))
    })
}

#[derive(Debug)]
struct SupplierRow {
    id: i64,
    nom: String,
    email: String,
}

impl<'r> FromRow<'r, PgRow> for SupplierRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(SupplierRow {
            id: row.try_get("id")?,
            nom: row.try_get("nom")?,
            email: row.try_get("email")?,
        })
    }
}

#[derive(Debug)]
struct LinkRow {
    fournisseur_id: i64,
    categorie_code: i64,
    categorie_libelle: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for LinkRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(LinkRow {
            fournisseur_id: row.try_get("fournisseur_id")?,
            categorie_code: row.try_get("categorie_code")?,
            categorie_libelle: row.try_get("categorie_libelle")?,
        })
    }
}
