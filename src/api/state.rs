use std::sync::Arc;

use crate::services::{providers::CatalogProvider, RankingConfig, SeedPlan};

/// Shared application state
///
/// Read-only after startup. Per-request results live in the request, not here.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub seeds: SeedPlan,
    pub ranking: RankingConfig,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogProvider>, seeds: SeedPlan, ranking: RankingConfig) -> Self {
        Self {
            catalog,
            seeds,
            ranking,
        }
    }
}
