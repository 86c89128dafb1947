use serde::Deserialize;
use std::time::Duration;

use crate::cache::memory::DEFAULT_CAPACITY;
use crate::services::{candidates::SeedPlan, ranker::RankingConfig};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Jikan API base URL
    #[serde(default = "default_jikan_api_url")]
    pub jikan_api_url: String,

    /// Redis connection URL. Search responses are cached in-process when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// How long a cached search response stays valid
    #[serde(default = "default_search_cache_ttl_secs")]
    pub search_cache_ttl_secs: u64,

    /// Most search responses kept by the in-process cache
    #[serde(default = "default_search_cache_capacity")]
    pub search_cache_capacity: u64,

    /// Minimum gap between two outbound catalog requests
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// Broad queries whose results are concatenated into the candidate pool
    #[serde(default = "default_seed_queries")]
    pub seed_queries: Vec<String>,

    /// Result limit for each seed query
    #[serde(default = "default_seed_limit")]
    pub seed_limit: u32,

    /// Minimum gap between two seed queries
    #[serde(default = "default_seed_interval_ms")]
    pub seed_interval_ms: u64,

    /// Candidates scoring at or below this are dropped
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Upper bound on candidates scored per request
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,

    /// Length of the returned recommendation list
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_jikan_api_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_search_cache_ttl_secs() -> u64 {
    300
}

fn default_search_cache_capacity() -> u64 {
    DEFAULT_CAPACITY
}

fn default_request_interval_ms() -> u64 {
    250
}

fn default_seed_queries() -> Vec<String> {
    ["popular", "action", "adventure", "drama", "fantasy"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_seed_limit() -> u32 {
    20
}

fn default_seed_interval_ms() -> u64 {
    500
}

fn default_min_similarity() -> f64 {
    RankingConfig::default().min_similarity
}

fn default_max_pool_size() -> usize {
    RankingConfig::default().max_pool_size
}

fn default_max_recommendations() -> usize {
    RankingConfig::default().max_results
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Threshold and size limits for the ranker
    pub fn ranking(&self) -> RankingConfig {
        RankingConfig {
            min_similarity: self.min_similarity,
            max_pool_size: self.max_pool_size,
            max_results: self.max_recommendations,
        }
    }

    /// Seed queries and pacing used to assemble the candidate pool
    pub fn seed_plan(&self) -> SeedPlan {
        SeedPlan {
            queries: self.seed_queries.clone(),
            limit: self.seed_limit,
            interval: Duration::from_millis(self.seed_interval_ms),
        }
    }

    pub fn search_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.search_cache_ttl_secs)
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
