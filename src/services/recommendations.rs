use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, RecommendationList, ScoredItem, SortKey, Suggestion},
    services::{
        candidates::{fetch_candidates, SeedPlan},
        pool::build_pool,
        providers::CatalogProvider,
        ranker::{rank, RankingConfig},
        sorter::resort,
    },
};

/// Result limit for the search that picks the reference item
pub const REFERENCE_SEARCH_LIMIT: u32 = 25;
pub const SUGGESTION_LIMIT: u32 = 5;
pub const MIN_SUGGESTION_QUERY_LEN: usize = 2;

/// Everything produced for one recommendation request
///
/// Replaced wholesale by the next request; nothing is kept between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSession {
    pub reference: CatalogItem,
    pub recommendations: RecommendationList,
}

/// A recommendation as rendered for clients
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    #[serde(flatten)]
    pub scored: ScoredItem,
    pub match_percent: u8,
}

impl From<ScoredItem> for RecommendationView {
    fn from(scored: ScoredItem) -> Self {
        let match_percent = scored.match_percent();
        Self {
            scored,
            match_percent,
        }
    }
}

pub fn render(list: RecommendationList) -> Vec<RecommendationView> {
    list.into_inner()
        .into_iter()
        .map(RecommendationView::from)
        .collect()
}

/// Finds anime similar to the best match for `query`
///
/// 1. Search the catalog; the first (most popular) hit is the reference item
/// 2. Fetch raw candidates from the seed queries
/// 3. Build the pool: drop the reference, dedup, cap
/// 4. Rank, then apply the requested ordering
pub async fn recommend_for_query(
    provider: &dyn CatalogProvider,
    seeds: &SeedPlan,
    ranking: &RankingConfig,
    query: &str,
    sort: SortKey,
) -> AppResult<RecommendationSession> {
    let reference = provider
        .search(query, REFERENCE_SEARCH_LIMIT)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("No anime found matching \"{}\"", query.trim())))?;

    tracing::info!(
        query = %query,
        reference_id = %reference.id,
        reference_title = %reference.title,
        "Selected reference item"
    );

    let raw = fetch_candidates(provider, seeds).await;
    let pool = build_pool(raw, &reference.id, ranking.max_pool_size);
    let mut recommendations = rank(&reference, pool, ranking);

    if sort != SortKey::Similarity {
        resort(&mut recommendations, sort);
    }

    tracing::info!(
        reference_id = %reference.id,
        recommendations = recommendations.len(),
        sort = ?sort,
        "Recommendations computed"
    );

    Ok(RecommendationSession {
        reference,
        recommendations,
    })
}

/// Autocomplete for the search box; never fails
pub async fn suggest(provider: &dyn CatalogProvider, query: &str) -> Vec<Suggestion> {
    let query = query.trim();
    if query.chars().count() < MIN_SUGGESTION_QUERY_LEN {
        return Vec::new();
    }

    match provider.search(query, SUGGESTION_LIMIT).await {
        Ok(items) => items
            .into_iter()
            .take(SUGGESTION_LIMIT as usize)
            .map(Suggestion::from)
            .collect(),
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "Autocomplete lookup failed");
            Vec::new()
        }
    }
}
