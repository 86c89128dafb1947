use std::cmp::Ordering;

use crate::models::{RecommendationList, ScoredItem, SortKey};

/// Reorders an existing recommendation list in place
///
/// Membership and stored similarity values are left untouched. Missing data is
/// handled differently from the similarity metric: an absent score sorts as the
/// lowest score, and an absent popularity rank sorts after every ranked item.
pub fn resort(list: &mut RecommendationList, key: SortKey) {
    let items = list.items_mut();
    match key {
        SortKey::Similarity => items.sort_by(|a, b| b.similarity.total_cmp(&a.similarity)),
        SortKey::Score => items.sort_by(|a, b| score_or_lowest(b).total_cmp(&score_or_lowest(a))),
        SortKey::Popularity => items.sort_by(by_popularity),
    }
}

fn score_or_lowest(scored: &ScoredItem) -> f64 {
    scored.item.declared_score().unwrap_or(0.0)
}

fn by_popularity(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    match (a.item.popularity_rank(), b.item.popularity_rank()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
