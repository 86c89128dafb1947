//! Jikan v4 (unofficial MyAnimeList API) provider
//!
//! API flow:
//! 1. Search: /anime?q=...&limit=...&order_by=popularity&sort=asc → `{ "data": [...] }`
//!
//! Jikan allows only a few requests per second, so every uncached request
//! passes through a shared `Throttle` first.

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{CatalogItem, JikanSearchResponse},
    services::{providers::CatalogProvider, throttle::Throttle},
};
use reqwest::{Client as HttpClient, StatusCode};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct JikanProvider {
    http_client: HttpClient,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
    throttle: Arc<Throttle>,
}

impl JikanProvider {
    pub fn new(cache: Cache, api_url: String, cache_ttl: u64, request_interval: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
            throttle: Arc::new(Throttle::new(request_interval)),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/anime", self.api_url)
    }

    /// Maps a non-success status to the error callers can act on
    fn status_error(status: StatusCode) -> AppError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            AppError::RateLimited
        } else {
            AppError::RequestFailed {
                status: status.as_u16(),
            }
        }
    }

    async fn fetch_search(&self, query: &str, limit: u32) -> AppResult<Vec<CatalogItem>> {
        self.throttle.wait().await;

        let limit_param = limit.to_string();
        let response = self
            .http_client
            .get(self.search_url())
            .query(&[
                ("q", query),
                ("limit", limit_param.as_str()),
                ("order_by", "popularity"),
                ("sort", "asc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(
                query = %query,
                status = status.as_u16(),
                provider = "jikan",
                "Catalog search rejected"
            );
            return Err(Self::status_error(status));
        }

        let body: JikanSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Malformed Jikan search response: {}", e)))?;
        let items: Vec<CatalogItem> = body.data.into_iter().map(CatalogItem::from).collect();

        tracing::info!(
            query = %query,
            limit = limit,
            results = items.len(),
            provider = "jikan",
            "Catalog search completed"
        );

        Ok(items)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for JikanProvider {
    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<CatalogItem>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Search {
                query: query.to_string(),
                limit,
            },
            self.cache_ttl,
            self.fetch_search(query, limit)
        )
    }

    fn name(&self) -> &'static str {
        "jikan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::models::ItemId;

    fn create_test_provider() -> JikanProvider {
        JikanProvider::new(
            Cache::Memory(MemoryCache::default()),
            "http://test.local/v4/".to_string(),
            300,
            Duration::ZERO,
        )
    }

    #[test]
    fn test_search_url_strips_trailing_slash() {
        let provider = create_test_provider();
        assert_eq!(provider.search_url(), "http://test.local/v4/anime");
    }

    #[test]
    fn test_status_error_rate_limited() {
        assert!(matches!(
            JikanProvider::status_error(StatusCode::TOO_MANY_REQUESTS),
            AppError::RateLimited
        ));
    }

    #[test]
    fn test_status_error_other_status() {
        assert!(matches!(
            JikanProvider::status_error(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::RequestFailed { status: 500 }
        ));
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_request() {
        let provider = create_test_provider();
        let result = provider.search("   ", 25).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_cached_response_skips_network() {
        let provider = create_test_provider();
        let mut cached_item = CatalogItem::new(20u64, "Naruto");
        cached_item.kind = Some("TV".to_string());

        provider.cache.store(
            &CacheKey::Search {
                query: "naruto".to_string(),
                limit: 25,
            },
            &vec![cached_item.clone()],
            300,
        )
        .await;

        // test.local never resolves, so a hit is the only way this succeeds
        let items = provider.search("Naruto", 25).await.unwrap();
        assert_eq!(items, vec![cached_item]);
        assert_eq!(items[0].id, ItemId::Numeric(20));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(create_test_provider().name(), "jikan");
    }
}
