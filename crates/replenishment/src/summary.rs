//! Structured result of a replenishment run.

/// Whether the run had anything to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No item was below its threshold; nothing was sent.
    NothingToResupply,
    /// At least one item needed resupply.
    Launched,
}

impl RunOutcome {
    pub fn message(self) -> &'static str {
        match self {
            RunOutcome::NothingToResupply => "Aucun médicament à réapprovisionner",
            RunOutcome::Launched => "Approvisionnement lancé avec succès",
        }
    }
}

/// One notified supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierDetail {
    pub supplier: String,
    pub email: String,
    /// Matched category labels, in the order they appear in the notification.
    pub categories: Vec<String>,
}

/// Summary of one run.
///
/// `notifications_sent` counts dispatch *attempts*: a supplier whose send
/// failed still counts and still has a detail record. Failures are only
/// tracked in `failed_dispatches` for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub items_needing_resupply: usize,
    pub notifications_sent: usize,
    pub details: Vec<SupplierDetail>,
    pub failed_dispatches: usize,
}

impl RunSummary {
    pub fn nothing_to_resupply() -> Self {
        Self {
            outcome: RunOutcome::NothingToResupply,
            items_needing_resupply: 0,
            notifications_sent: 0,
            details: Vec::new(),
            failed_dispatches: 0,
        }
    }

    pub fn message(&self) -> &'static str {
        self.outcome.message()
    }
}
