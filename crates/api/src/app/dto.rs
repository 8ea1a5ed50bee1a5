use serde::Serialize;

use pharmacie_replenishment::{RunSummary, SupplierDetail};

// -------------------------
// Response DTOs
// -------------------------

/// Body returned by the replenishment trigger.
#[derive(Debug, Serialize)]
pub struct ReplenishmentResponse {
    pub message: String,
    #[serde(rename = "medicamentsAReapprovisionner")]
    pub items_needing_resupply: usize,
    #[serde(rename = "mailsEnvoyes")]
    pub notifications_sent: usize,
    pub details: Vec<SupplierDetailResponse>,
}

#[derive(Debug, Serialize)]
pub struct SupplierDetailResponse {
    #[serde(rename = "fournisseur")]
    pub supplier: String,
    pub email: String,
    #[serde(rename = "categoriesConcernees")]
    pub categories: Vec<String>,
}

// -------------------------
// Mapping helpers
// -------------------------

pub fn summary_to_response(summary: RunSummary) -> ReplenishmentResponse {
    ReplenishmentResponse {
        message: summary.message().to_string(),
        items_needing_resupply: summary.items_needing_resupply,
        notifications_sent: summary.notifications_sent,
        details: summary.details.into_iter().map(detail_to_response).collect(),
    }
}

fn detail_to_response(d: SupplierDetail) -> SupplierDetailResponse {
    SupplierDetailResponse {
        supplier: d.supplier,
        email: d.email,
        categories: d.categories,
    }
}
