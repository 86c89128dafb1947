/// Returns a cached value for `$key`, or computes, stores and returns it.
///
/// On a miss the block runs, its value is written through
/// `store` with `$ttl` seconds of validity, and the fresh value
/// is returned. Errors from the block propagate with `?` and are never cached.
///
/// # Arguments
/// * `$cache`: anything with `get_from_cache` and `store`, normally [`Cache`](crate::cache::Cache).
/// * `$key`: the [`CacheKey`](crate::cache::CacheKey) to look up.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future producing an `AppResult` of the value.
///
/// # Example
/// ```rust,ignore
/// let items: Vec<CatalogItem> = cached!(self.cache, key, 300, async move {
///     fetch_from_api().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $block.await?;
            $cache.store(&key, &value, $ttl).await;
            Ok(value)
        }
    }};
}
