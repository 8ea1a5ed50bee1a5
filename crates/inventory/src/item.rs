use serde::{Deserialize, Serialize};

use pharmacie_core::{CategoryCode, DomainError, DomainResult, ItemId};

/// Category of stock items (and capability tag of suppliers).
///
/// Identity is the `code`: two categories with the same code are equal even if
/// their labels differ, and hashing ignores the label as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    code: CategoryCode,
    label: String,
}

impl Category {
    pub fn new(code: CategoryCode, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }

    pub fn code(&self) -> CategoryCode {
        self.code
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Category {}

impl core::hash::Hash for Category {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// A stock item as read from storage. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    id: ItemId,
    name: String,
    category: Category,
    on_hand: u32,
    threshold: u32,
}

/// Unvalidated wire/storage shape of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub on_hand: u32,
    pub threshold: u32,
}

impl Item {
    /// Build an item, rejecting blank names.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        category: Category,
        on_hand: u32,
        threshold: u32,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            category,
            on_hand,
            threshold,
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn on_hand(&self) -> u32 {
        self.on_hand
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// True when on-hand stock has fallen strictly below the reorder threshold.
    pub fn needs_resupply(&self) -> bool {
        self.on_hand < self.threshold
    }
}

impl TryFrom<ItemRecord> for Item {
    type Error = DomainError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        Item::new(
            record.id,
            record.name,
            record.category,
            record.on_hand,
            record.threshold,
        )
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            on_hand: item.on_hand,
            threshold: item.threshold,
        }
    }
}
