//! Caching layer for lookups.
//!
//! Weather and flight data change slowly relative to how often a user
//! repeats a query, so successful lookups are kept for a short TTL. Keys
//! are the trimmed, lowercased query; failures are never cached.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use super::error::LookupError;
use super::fetcher::DetailsFetcher;

/// Configuration for the lookup cache.
#[derive(Debug, Clone)]
pub struct LookupCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for LookupCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 256,
        }
    }
}

/// Any [`DetailsFetcher`] with caching.
pub struct CachedFetcher<F>
where
    F: DetailsFetcher,
    F::Record: Clone + Send + Sync + 'static,
{
    inner: F,
    cache: MokaCache<String, F::Record>,
}

impl<F> CachedFetcher<F>
where
    F: DetailsFetcher,
    F::Record: Clone + Send + Sync + 'static,
{
    /// Wrap `inner` with a cache built from `config`.
    pub fn new(inner: F, config: &LookupCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Access the wrapped fetcher for lookups that bypass the cache.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Get cache statistics (approximate).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

fn cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

impl<F> DetailsFetcher for CachedFetcher<F>
where
    F: DetailsFetcher + Sync,
    F::Record: Clone + Send + Sync + 'static,
{
    type Record = F::Record;

    async fn fetch_details(&self, query: &str) -> Result<F::Record, LookupError> {
        let key = cache_key(query);

        if let Some(cached) = self.cache.get(&key).await {
            trace!(query = %key, "lookup cache hit");
            return Ok(cached);
        }

        let record = self.inner.fetch_details(query).await?;
        self.cache.insert(key, record.clone()).await;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls; fails for queries containing "nowhere".
    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl DetailsFetcher for CountingFetcher {
        type Record = String;

        async fn fetch_details(&self, query: &str) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.contains("nowhere") {
                return Err(LookupError::NotFound {
                    query: query.to_string(),
                });
            }
            Ok(format!("report for {query}"))
        }
    }

    fn cached() -> CachedFetcher<CountingFetcher> {
        CachedFetcher::new(CountingFetcher::default(), &LookupCacheConfig::default())
    }

    fn calls(fetcher: &CachedFetcher<CountingFetcher>) -> usize {
        fetcher.inner().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn default_config() {
        let config = LookupCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 256);
    }

    #[test]
    fn key_normalization() {
        assert_eq!(cache_key("  Paris "), "paris");
        assert_eq!(cache_key("NEW YORK"), "new york");
    }

    #[tokio::test]
    async fn repeated_query_hits_cache() {
        let fetcher = cached();

        let first = fetcher.fetch_details("Paris").await.unwrap();
        let second = fetcher.fetch_details(" paris ").await.unwrap();

        assert_eq!(first, "report for Paris");
        // The cached record from the first spelling is returned
        assert_eq!(second, first);
        assert_eq!(calls(&fetcher), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let fetcher = cached();

        assert!(fetcher.fetch_details("nowhere").await.is_err());
        assert!(fetcher.fetch_details("nowhere").await.is_err());
        assert_eq!(calls(&fetcher), 2);
    }
}
