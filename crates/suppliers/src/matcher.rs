//! Supplier matching: which pending categories can each supplier deliver?

use pharmacie_inventory::{Item, ResupplyGroups};

use crate::supplier::Supplier;

/// Rendered item lines keyed by category label, in insertion order.
///
/// Re-inserting an existing label replaces its lines but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLines {
    entries: Vec<(String, Vec<String>)>,
}

impl CategoryLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, lines: Vec<String>) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = lines,
            None => self.entries.push((label, lines)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(l, lines)| (l.as_str(), lines.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A supplier together with the pending categories it services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedSupplier<'a> {
    pub supplier: &'a Supplier,
    pub categories: CategoryLines,
}

/// Match one supplier against the pending groups.
///
/// Walks the supplier's own category order (not the grouping order) and keeps
/// each category that has at least one pending item. Returns `None` when
/// nothing matches.
pub fn match_supplier<'a, F>(
    supplier: &'a Supplier,
    groups: &ResupplyGroups,
    render: F,
) -> Option<MatchedSupplier<'a>>
where
    F: Fn(&Item) -> String,
{
    let mut categories = CategoryLines::new();

    for category in supplier.categories() {
        let Some(items) = groups.get(category.code()) else {
            continue;
        };
        if items.is_empty() {
            continue;
        }
        categories.insert(category.label(), items.iter().map(&render).collect());
    }

    if categories.is_empty() {
        None
    } else {
        Some(MatchedSupplier { supplier, categories })
    }
}

/// Match every supplier, in input order, dropping the ones with no match.
pub fn match_suppliers<'a, F>(
    suppliers: &'a [Supplier],
    groups: &ResupplyGroups,
    render: F,
) -> Vec<MatchedSupplier<'a>>
where
    F: Fn(&Item) -> String,
{
    suppliers
        .iter()
        .filter_map(|s| match_supplier(s, groups, &render))
        .collect()
}
