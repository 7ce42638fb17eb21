//! In-memory cache-aside store keyed by opaque strings.
//!
//! Uses [`moka`] for async-friendly caching with a store-wide time-to-live
//! and lazy eviction on access. The only mutation path is
//! [`MemoryCache::get_or_create`]: callers supply a producer that runs on a
//! miss and whose successful value is stored until the TTL elapses.
//!
//! Concurrent misses on the same key are NOT coalesced — each caller runs
//! its own producer and the last insert wins. Per-key single-flight (e.g.
//! moka's `get_with`) is a possible extension, not part of this contract.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;

use crate::Error;

/// Maximum number of cached entries before size-based eviction.
const MAX_CACHE_ENTRIES: u64 = 1_000;

/// A keyed value store with time-based expiry.
///
/// The TTL is fixed at construction (configuration supplies it in minutes);
/// it is not a per-call parameter.
pub struct MemoryCache<T> {
    inner: Cache<String, T>,
}

impl<T> MemoryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a store whose entries expire `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Return the cached value for `key`, or run `produce` and cache its
    /// result.
    ///
    /// On a hit the producer is never invoked. On a miss the producer runs
    /// once, synchronously within the calling task; if it fails, nothing is
    /// cached and the error propagates unchanged, so the next call for the
    /// same key runs the producer again.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKey` if `key` is empty; otherwise only the
    /// producer's own error.
    pub async fn get_or_create<F, Fut>(&self, key: &str, produce: F) -> Result<T, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }

        if let Some(hit) = self.inner.get(key).await {
            tracing::debug!(key, "cache hit");
            return Ok(hit);
        }

        tracing::debug!(key, "cache miss, invoking producer");
        let value = produce().await?;
        self.inner.insert(key.to_string(), value.clone()).await;

        Ok(value)
    }
}
