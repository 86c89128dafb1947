use std::collections::HashSet;

use crate::models::{CatalogItem, ItemId};

/// Turns raw seed-query results into the candidate pool for one reference item
///
/// Drops the reference itself, keeps the first occurrence of every id in input
/// order, and stops once `max_pool_size` candidates have been collected.
pub fn build_pool(
    raw: Vec<CatalogItem>,
    reference_id: &ItemId,
    max_pool_size: usize,
) -> Vec<CatalogItem> {
    let mut seen: HashSet<ItemId> = HashSet::new();

    raw.into_iter()
        .filter(|item| &item.id != reference_id)
        .filter(|item| seen.insert(item.id.clone()))
        .take(max_pool_size)
        .collect()
}
