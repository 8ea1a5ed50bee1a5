//! Run orchestration.

use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

use pharmacie_core::RunId;
use pharmacie_inventory::{group_by_category, select_needing_resupply, Item};
use pharmacie_notifications::{compose, item_line, MessageTransport, NotificationDispatcher};
use pharmacie_suppliers::{match_suppliers, Supplier, SupplierDirectory};

use crate::repository::{CatalogRepository, StorageError};
use crate::summary::{RunOutcome, RunSummary, SupplierDetail};

/// Failure of a whole run. Only storage failures qualify; send failures are
/// absorbed by the dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Orchestrates one replenishment run per call.
///
/// Holds only its collaborators; every run derives its own groups and summary,
/// so concurrent calls do not share mutable state.
#[derive(Debug)]
pub struct RunCoordinator<R, T> {
    repository: R,
    dispatcher: NotificationDispatcher<T>,
}

impl<R, T> RunCoordinator<R, T>
where
    R: CatalogRepository,
    T: MessageTransport,
{
    pub fn new(repository: R, transport: T) -> Self {
        Self {
            repository,
            dispatcher: NotificationDispatcher::new(transport),
        }
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher<T> {
        &self.dispatcher
    }

    /// Load catalog and suppliers from storage, then run.
    pub async fn run_from_storage(&self) -> Result<RunSummary, RunError> {
        let run_id = RunId::new();
        self.load_and_process()
            .instrument(info_span!("replenishment_run", %run_id))
            .await
    }

    /// Run against already-loaded data.
    pub async fn run(&self, items: &[Item], suppliers: &[Supplier]) -> RunSummary {
        let needing = select_needing_resupply(items);
        if needing.is_empty() {
            info!("nothing to resupply");
            return RunSummary::nothing_to_resupply();
        }
        let directory = SupplierDirectory::new(suppliers.to_vec());
        self.process(needing, &directory).await
    }

    async fn load_and_process(&self) -> Result<RunSummary, RunError> {
        info!("starting replenishment run");
        let items = self.repository.list_all_items().await?;
        let needing = select_needing_resupply(&items);
        if needing.is_empty() {
            info!("nothing to resupply");
            return Ok(RunSummary::nothing_to_resupply());
        }

        let suppliers = self.repository.list_all_suppliers_with_categories().await?;
        let directory = SupplierDirectory::from(suppliers);
        Ok(self.process(needing, &directory).await)
    }

    async fn process(&self, needing: Vec<Item>, directory: &SupplierDirectory) -> RunSummary {
        info!(count = needing.len(), suppliers = directory.len(), "items need resupply");

        let groups = group_by_category(&needing);
        for (category, items) in groups.iter() {
            if directory.servicing(category.code()).next().is_none() {
                warn!(
                    category = category.label(),
                    items = items.len(),
                    "no supplier services this category"
                );
            }
        }

        let mut notifications_sent = 0usize;
        let mut failed_dispatches = 0usize;
        let mut details = Vec::new();

        for matched in match_suppliers(directory.all(), &groups, item_line) {
            let supplier = matched.supplier;
            let body = compose(supplier, &matched.categories);
            let result = self.dispatcher.dispatch(supplier, &body).await;
            // Attempts are counted, delivered or not.
            notifications_sent += 1;
            if !result.success {
                failed_dispatches += 1;
            }

            details.push(SupplierDetail {
                supplier: supplier.name().to_string(),
                email: supplier.email().to_string(),
                categories: matched.categories.labels().map(str::to_string).collect(),
            });
        }

        info!(notifications_sent, failed_dispatches, "replenishment run finished");

        RunSummary {
            outcome: RunOutcome::Launched,
            items_needing_resupply: needing.len(),
            notifications_sent,
            details,
            failed_dispatches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pharmacie_core::{CategoryCode, ItemId, SupplierId};
    use pharmacie_inventory::Category;
    use pharmacie_notifications::{RecordingTransport, TransportError, SUBJECT};

    fn category(code: i64) -> Category {
        Category::new(CategoryCode::new(code), format!("C{code}-label"))
    }

    fn item(id: i64, name: &str, cat: i64, on_hand: u32, threshold: u32) -> Item {
        Item::new(ItemId::new(id), name, category(cat), on_hand, threshold).unwrap()
    }

    fn supplier(id: i64, name: &str, cats: &[i64]) -> Supplier {
        Supplier::new(
            SupplierId::new(id),
            name,
            format!("{}@example.com", name.to_lowercase()),
            cats.iter().map(|c| category(*c)),
        )
        .unwrap()
    }

    struct FixedCatalog {
        items: Result<Vec<Item>, StorageError>,
        suppliers: Vec<Supplier>,
        supplier_loads: AtomicUsize,
    }

    impl FixedCatalog {
        fn new(items: Vec<Item>, suppliers: Vec<Supplier>) -> Self {
            Self {
                items: Ok(items),
                suppliers,
                supplier_loads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogRepository for FixedCatalog {
        async fn list_all_items(&self) -> Result<Vec<Item>, StorageError> {
            self.items.clone()
        }

        async fn list_all_suppliers_with_categories(&self) -> Result<Vec<Supplier>, StorageError> {
            self.supplier_loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.suppliers.clone())
        }
    }

    fn coordinator(
        items: Vec<Item>,
        suppliers: Vec<Supplier>,
        transport: RecordingTransport,
    ) -> RunCoordinator<FixedCatalog, RecordingTransport> {
        RunCoordinator::new(FixedCatalog::new(items, suppliers), transport)
    }

    #[tokio::test]
    async fn single_item_single_supplier_scenario() {
        let c = coordinator(
            vec![item(1, "Aspirin", 1, 2, 10)],
            vec![supplier(1, "AcmeCo", &[1])],
            RecordingTransport::new(),
        );

        let summary = c.run_from_storage().await.unwrap();

        assert_eq!(summary.outcome, RunOutcome::Launched);
        assert_eq!(summary.items_needing_resupply, 1);
        assert_eq!(summary.notifications_sent, 1);
        assert_eq!(
            summary.details,
            vec![SupplierDetail {
                supplier: "AcmeCo".to_string(),
                email: "acmeco@example.com".to_string(),
                categories: vec!["C1-label".to_string()],
            }]
        );

        let sent = c.dispatcher().transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, SUBJECT);
        assert!(sent[0].body.starts_with("Bonjour AcmeCo,"));
        assert!(sent[0].body.contains("=== C1-label ===\n  - Aspirin (stock: 2, seuil: 10)\n"));
    }

    #[tokio::test]
    async fn nothing_to_resupply_short_circuits() {
        let c = coordinator(
            vec![item(1, "Aspirin", 1, 10, 10), item(2, "Doliprane", 1, 50, 5)],
            vec![supplier(1, "AcmeCo", &[1])],
            RecordingTransport::new(),
        );

        let summary = c.run_from_storage().await.unwrap();

        assert_eq!(summary, RunSummary::nothing_to_resupply());
        assert_eq!(summary.message(), "Aucun médicament à réapprovisionner");
        assert_eq!(c.repository.supplier_loads.load(Ordering::SeqCst), 0);
        assert_eq!(c.dispatcher().transport().attempts(), 0);
    }

    #[tokio::test]
    async fn empty_catalog_is_not_an_error() {
        let c = coordinator(vec![], vec![], RecordingTransport::new());
        let summary = c.run_from_storage().await.unwrap();
        assert_eq!(summary.outcome, RunOutcome::NothingToResupply);
    }

    #[tokio::test]
    async fn supplier_without_pending_category_is_excluded() {
        let c = coordinator(
            vec![item(1, "Aspirin", 1, 0, 3)],
            vec![supplier(1, "OtherCo", &[2])],
            RecordingTransport::new(),
        );

        let summary = c.run_from_storage().await.unwrap();

        assert_eq!(summary.items_needing_resupply, 1);
        assert_eq!(summary.notifications_sent, 0);
        assert!(summary.details.is_empty());
        assert_eq!(summary.message(), "Approvisionnement lancé avec succès");
    }

    #[tokio::test]
    async fn failed_send_still_counts_and_does_not_affect_other_suppliers() {
        let items = vec![item(1, "Aspirin", 1, 0, 3), item(2, "Toplexil", 2, 1, 4)];
        let suppliers = vec![
            supplier(1, "Down", &[1]),
            supplier(2, "Up", &[2, 1]),
        ];

        let healthy = coordinator(items.clone(), suppliers.clone(), RecordingTransport::new());
        let partial = coordinator(
            items,
            suppliers,
            RecordingTransport::new().failing_for(
                "down@example.com",
                TransportError::Rejected {
                    status: 503,
                    body: "unavailable".to_string(),
                },
            ),
        );

        let baseline = healthy.run_from_storage().await.unwrap();
        let summary = partial.run_from_storage().await.unwrap();

        assert_eq!(summary.notifications_sent, 2);
        assert_eq!(summary.failed_dispatches, 1);
        assert_eq!(summary.details, baseline.details);
        assert_eq!(summary.details[1].categories, vec!["C2-label", "C1-label"]);

        let sent = partial.dispatcher().transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].address, "up@example.com");
        assert_eq!(partial.dispatcher().transport().attempts(), 2);
    }

    #[tokio::test]
    async fn storage_failure_is_fatal() {
        let mut catalog = FixedCatalog::new(vec![], vec![]);
        catalog.items = Err(StorageError::Unavailable("connection refused".to_string()));
        let c = RunCoordinator::new(catalog, RecordingTransport::new());

        let err = c.run_from_storage().await.unwrap_err();
        assert_eq!(
            err,
            RunError::Storage(StorageError::Unavailable("connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn run_on_loaded_data_groups_items_in_catalog_order() {
        let c = coordinator(vec![], vec![], RecordingTransport::new());
        let items = vec![
            item(1, "A", 1, 0, 1),
            item(2, "B", 2, 0, 1),
            item(3, "C", 1, 0, 1),
        ];
        let suppliers = vec![supplier(1, "AcmeCo", &[1, 2])];

        let summary = c.run(&items, &suppliers).await;
        assert_eq!(summary.items_needing_resupply, 3);

        let body = &c.dispatcher().transport().sent()[0].body;
        let a = body.find("  - A (").unwrap();
        let cc = body.find("  - C (").unwrap();
        let b = body.find("  - B (").unwrap();
        assert!(a < cc && cc < b);
    }
}
