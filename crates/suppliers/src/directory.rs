//! Read-only supplier directory, eagerly loaded with every supplier's categories.

use pharmacie_core::CategoryCode;

use crate::supplier::Supplier;

/// Ordered, fully-populated list of suppliers for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierDirectory {
    suppliers: Vec<Supplier>,
}

impl SupplierDirectory {
    pub fn new(suppliers: Vec<Supplier>) -> Self {
        Self { suppliers }
    }

    pub fn all(&self) -> &[Supplier] {
        &self.suppliers
    }

    /// Suppliers that service the given category, in directory order.
    pub fn servicing(&self, code: CategoryCode) -> impl Iterator<Item = &Supplier> {
        self.suppliers.iter().filter(move |s| s.services(code))
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

impl From<Vec<Supplier>> for SupplierDirectory {
    fn from(suppliers: Vec<Supplier>) -> Self {
        Self::new(suppliers)
    }
}
