use crate::models::{CatalogItem, RecommendationList, ScoredItem};
use crate::services::similarity::similarity;

/// Thresholds and size limits for building a recommendation list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    /// Candidates with similarity at or below this are treated as unrelated
    pub min_similarity: f64,
    /// Maximum number of candidates considered per request
    pub max_pool_size: usize,
    /// Maximum number of recommendations returned
    pub max_results: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.05,
            max_pool_size: 100,
            max_results: 12,
        }
    }
}

/// Scores every candidate against `reference` and keeps the best matches
///
/// Candidates at or below `config.min_similarity` are dropped. The rest are
/// sorted by descending similarity; the sort is stable, so exact ties keep
/// their pool order. At most `config.max_results` entries are returned.
pub fn rank(
    reference: &CatalogItem,
    pool: Vec<CatalogItem>,
    config: &RankingConfig,
) -> RecommendationList {
    let mut scored: Vec<ScoredItem> = pool
        .into_iter()
        .map(|item| {
            let similarity = similarity(reference, &item);
            ScoredItem { item, similarity }
        })
        .filter(|scored| scored.similarity > config.min_similarity)
        .collect();

    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(config.max_results);

    tracing::debug!(
        reference = %reference.id,
        kept = scored.len(),
        "Ranked candidate pool"
    );

    RecommendationList::from_ranked(scored)
}
