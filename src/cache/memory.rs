use std::time::Duration;

use moka::future::Cache as MokaCache;

/// Default upper bound on cached search responses
pub const DEFAULT_CAPACITY: u64 = 1_000;

/// In-process search cache
///
/// Entries expire `ttl` after insertion whether or not they are read again,
/// and the least useful ones are evicted once `capacity` is reached.
#[derive(Clone)]
pub struct MemoryCache {
    entries: MokaCache<String, String>,
}

impl MemoryCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).await
    }

    pub async fn insert(&self, key: String, value: String) {
        self.entries.insert(key, value).await;
    }

    /// Approximate entry count; exact after `run_pending_tasks`
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Applies pending evictions and expirations now
    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(300), DEFAULT_CAPACITY)
    }
}
