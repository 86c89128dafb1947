use std::fmt::Display;
use std::time::Duration;

use crate::error::{AppError, AppResult};

mod macros;
pub mod memory;
pub mod redis;

pub use self::memory::MemoryCache;
pub use self::redis::{create_redis_client, CacheWriterHandle, RedisCache};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Raw catalog search response for a query and result limit
    Search { query: String, limit: u32 },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search { query, limit } => {
                write!(f, "search:{}:{}", query.trim().to_lowercase(), limit)
            }
        }
    }
}

/// Cache for catalog responses, stored as JSON under a `CacheKey` with a TTL
#[derive(Clone)]
pub enum Cache {
    Memory(MemoryCache),
    Redis(RedisCache),
}

impl Cache {
    /// Builds the configured backend: Redis when a URL is given, in-process otherwise
    ///
    /// `ttl` and `capacity` only apply to the in-process backend; Redis takes
    /// the TTL given with each write.
    pub async fn connect(
        redis_url: Option<&str>,
        ttl: Duration,
        capacity: u64,
    ) -> anyhow::Result<(Self, Option<CacheWriterHandle>)> {
        match redis_url {
            Some(url) => {
                let client = create_redis_client(url)?;
                let (cache, handle) = RedisCache::connect(client).await?;
                tracing::info!(backend = "redis", "Search cache ready");
                Ok((Cache::Redis(cache), Some(handle)))
            }
            None => {
                tracing::info!(backend = "memory", capacity, "Search cache ready");
                Ok((Cache::Memory(MemoryCache::new(ttl, capacity)), None))
            }
        }
    }

    /// Retrieves and deserializes a value, or `None` on a miss or expiry
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let raw = match self {
            Cache::Memory(cache) => cache.get(&key.to_string()).await,
            Cache::Redis(cache) => cache.get(&key.to_string()).await?,
        };

        match raw {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Serializes and stores a value
    ///
    /// The in-process backend stores immediately and applies its own TTL. The
    /// Redis backend queues the write with `ttl` seconds and returns at once.
    pub async fn store<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        match self {
            Cache::Memory(cache) => cache.insert(key.to_string(), json).await,
            Cache::Redis(cache) => cache.set_in_background(key.to_string(), json, ttl),
        }
    }
}
