use std::time::Duration;

use crate::{
    models::CatalogItem,
    services::{providers::CatalogProvider, throttle::Throttle},
};

/// Which broad queries are combined into the raw candidate list, and how they are paced
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    pub queries: Vec<String>,
    pub limit: u32,
    /// Minimum gap between the start of two seed queries
    pub interval: Duration,
}

/// Runs every seed query in order and concatenates the results
///
/// A failing seed is logged and skipped. If every seed fails the result is
/// empty, which the ranker turns into an empty recommendation list. The
/// output is raw: it still contains duplicates and possibly the reference item.
pub async fn fetch_candidates(provider: &dyn CatalogProvider, plan: &SeedPlan) -> Vec<CatalogItem> {
    let throttle = Throttle::new(plan.interval);
    let mut candidates = Vec::new();
    let mut failures = 0usize;

    for query in &plan.queries {
        throttle.wait().await;

        match provider.search(query, plan.limit).await {
            Ok(items) => {
                tracing::debug!(seed = %query, results = items.len(), "Seed query completed");
                candidates.extend(items);
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(
                    seed = %query,
                    provider = provider.name(),
                    error = %e,
                    "Seed query failed, skipping"
                );
            }
        }
    }

    if failures > 0 {
        tracing::warn!(
            success_count = plan.queries.len() - failures,
            error_count = failures,
            "Partial candidate fetch failure"
        );
    }

    tracing::info!(
        seeds = plan.queries.len(),
        candidates = candidates.len(),
        "Candidate pool fetched"
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ItemId;
    use crate::services::providers::MockCatalogProvider;
    use tokio::time::Instant;

    fn plan(queries: &[&str], interval_ms: u64) -> SeedPlan {
        SeedPlan {
            queries: queries.iter().map(|q| q.to_string()).collect(),
            limit: 20,
            interval: Duration::from_millis(interval_ms),
        }
    }

    fn item(id: u64) -> CatalogItem {
        CatalogItem::new(id, format!("anime {}", id))
    }

    fn mock_provider() -> MockCatalogProvider {
        let mut provider = MockCatalogProvider::new();
        provider.expect_name().return_const("mock");
        provider
    }

    #[tokio::test(start_paused = true)]
    async fn test_concatenates_seeds_in_order() {
        let mut provider = mock_provider();
        provider
            .expect_search()
            .withf(|query, limit| query == "action" && *limit == 20)
            .times(1)
            .returning(|_, _| Ok(vec![item(1), item(2)]));
        provider
            .expect_search()
            .withf(|query, _| query == "drama")
            .times(1)
            .returning(|_, _| Ok(vec![item(2), item(3)]));

        let candidates = fetch_candidates(&provider, &plan(&["action", "drama"], 500)).await;
        let ids: Vec<ItemId> = candidates.iter().map(|c| c.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                ItemId::Numeric(1),
                ItemId::Numeric(2),
                ItemId::Numeric(2),
                ItemId::Numeric(3)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_seed_is_skipped() {
        let mut provider = mock_provider();
        provider
            .expect_search()
            .withf(|query, _| query == "popular")
            .returning(|_, _| Err(AppError::RateLimited));
        provider
            .expect_search()
            .withf(|query, _| query == "fantasy")
            .returning(|_, _| Ok(vec![item(7)]));

        let candidates = fetch_candidates(&provider, &plan(&["popular", "fantasy"], 0)).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, ItemId::Numeric(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_seeds_failing_yields_empty() {
        let mut provider = mock_provider();
        provider
            .expect_search()
            .returning(|_, _| Err(AppError::RequestFailed { status: 500 }));

        let candidates = fetch_candidates(&provider, &plan(&["a", "b", "c"], 0)).await;
        assert!(candidates.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeds_are_spaced_by_interval() {
        let mut provider = mock_provider();
        provider.expect_search().times(5).returning(|_, _| Ok(Vec::new()));

        let start = Instant::now();
        fetch_candidates(&provider, &plan(&["a", "b", "c", "d", "e"], 500)).await;

        // four gaps between five calls
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }
}
