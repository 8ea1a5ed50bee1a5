use serde::{Deserialize, Serialize};

use pharmacie_core::{CategoryCode, DomainError, DomainResult, SupplierId};
use pharmacie_inventory::Category;

const MAX_FIELD_LEN: usize = 255;

/// A supplier (fournisseur) and the categories it can deliver.
///
/// The serviced categories behave as a set that remembers declaration order:
/// duplicates are collapsed on construction, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SupplierRecord", into = "SupplierRecord")]
pub struct Supplier {
    id: SupplierId,
    name: String,
    email: String,
    categories: Vec<Category>,
}

/// Unvalidated wire/storage shape of a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub id: SupplierId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Supplier {
    pub fn new(
        id: SupplierId,
        name: impl Into<String>,
        email: impl Into<String>,
        categories: impl IntoIterator<Item = Category>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();

        validate_field("supplier name", &name)?;
        validate_field("supplier email", &email)?;
        if !looks_like_email(&email) {
            return Err(DomainError::validation(format!(
                "supplier email is not a valid address: {email}"
            )));
        }

        let mut deduped: Vec<Category> = Vec::new();
        for category in categories {
            if !deduped.contains(&category) {
                deduped.push(category);
            }
        }

        Ok(Self {
            id,
            name,
            email,
            categories: deduped,
        })
    }

    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact address notifications are sent to.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Serviced categories in declared order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn services(&self, code: CategoryCode) -> bool {
        self.categories.iter().any(|c| c.code() == code)
    }
}

impl TryFrom<SupplierRecord> for Supplier {
    type Error = DomainError;

    fn try_from(record: SupplierRecord) -> Result<Self, Self::Error> {
        Supplier::new(record.id, record.name, record.email, record.categories)
    }
}

impl From<Supplier> for SupplierRecord {
    fn from(s: Supplier) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            categories: s.categories,
        }
    }
}

fn validate_field(what: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{what} cannot be empty")));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(DomainError::validation(format!(
            "{what} exceeds {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(())
}

// Shape check only: one '@', non-empty local part, dotted domain, no whitespace.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
