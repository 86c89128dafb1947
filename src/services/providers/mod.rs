//! Catalog data provider abstraction
//!
//! The ranking core never talks to the network. Providers own transport,
//! caching and request pacing, and hand back normalized `CatalogItem`s.

use crate::{error::AppResult, models::CatalogItem};

pub mod jikan;

pub use jikan::JikanProvider;

/// Trait for remote catalog search backends
///
/// Failures are terminal for the call: `AppError::RateLimited` when the remote
/// throttles us and `AppError::RequestFailed` for any other non-success status.
/// Retrying is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search the catalog, most popular matches first
    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<CatalogItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
