//! Grouping of resupply items by category identity.

use std::collections::HashMap;

use pharmacie_core::CategoryCode;

use crate::item::{Category, Item};

/// Items needing resupply, partitioned by category.
///
/// Categories iterate in first-encountered order and items keep their relative
/// input order inside each group, so everything derived from a grouping is
/// deterministic for a fixed catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResupplyGroups {
    groups: Vec<(Category, Vec<Item>)>,
    index: HashMap<CategoryCode, usize>,
}

impl ResupplyGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the group of its category, opening the group if needed.
    pub fn push(&mut self, item: Item) {
        let code = item.category().code();
        match self.index.get(&code) {
            Some(&slot) => self.groups[slot].1.push(item),
            None => {
                self.index.insert(code, self.groups.len());
                self.groups.push((item.category().clone(), vec![item]));
            }
        }
    }

    /// Items of one category, if any are pending.
    pub fn get(&self, code: CategoryCode) -> Option<&[Item]> {
        self.index
            .get(&code)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &[Item])> {
        self.groups.iter().map(|(c, items)| (c, items.as_slice()))
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of items across all groups.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|(_, items)| items.len()).sum()
    }
}

impl FromIterator<Item> for ResupplyGroups {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut groups = ResupplyGroups::new();
        for item in iter {
            groups.push(item);
        }
        groups
    }
}

/// Partition items by category identity (see [`ResupplyGroups`] for ordering).
pub fn group_by_category(items: &[Item]) -> ResupplyGroups {
    items.iter().cloned().collect()
}
