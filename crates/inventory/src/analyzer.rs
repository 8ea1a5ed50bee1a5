//! Stock analysis: narrows the full catalog to the items that must be reordered.

use crate::item::Item;

/// Select the items whose on-hand quantity is below their reorder threshold.
///
/// Input order is preserved; an empty result means there is nothing to resupply.
pub fn select_needing_resupply(items: &[Item]) -> Vec<Item> {
    items.iter().filter(|i| i.needs_resupply()).cloned().collect()
}
