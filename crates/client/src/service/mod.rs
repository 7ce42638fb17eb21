//! Result acquisition: cache-aside orchestration of fetch, extract, match,
//! and persist.
//!
//! One service instance owns the whole pipeline. Collaborators come in
//! through the constructor; there is no ambient registry. Every internal
//! failure during acquisition surfaces to the caller as the single
//! `AcquisitionFailed` kind, with the stage-level detail kept in the logs.

use std::sync::Arc;

use chrono::Utc;
use serptrack_core::{Error, HistoryDb, MemoryCache, SearchQuery, SearchResult};

use crate::extract::{extract_links, match_positions};
use crate::fetch::SearchPageFetcher;

/// Orchestrates rank lookups with a cache-aside store in front of the
/// fetch + extract + match + persist pipeline.
pub struct RankService {
    fetcher: Arc<dyn SearchPageFetcher>,
    cache: MemoryCache<SearchResult>,
    history: HistoryDb,
}

impl RankService {
    /// Compose a service from its collaborators.
    pub fn new(fetcher: Arc<dyn SearchPageFetcher>, cache: MemoryCache<SearchResult>, history: HistoryDb) -> Self {
        Self { fetcher, cache, history }
    }

    /// Return the (possibly cached) rank lookup for `query`.
    ///
    /// The cache key is the exact `keyword_url` concatenation. On a miss the
    /// producer fetches the results page, extracts and matches links,
    /// applies the not-found sentinel, persists the outcome, and caches it.
    /// Nothing is cached or persisted when any stage fails, and no retry is
    /// attempted; retrying is the caller's decision.
    ///
    /// # Errors
    ///
    /// Returns `Error::AcquisitionFailed` for every internal failure.
    pub async fn acquire(&self, query: &SearchQuery) -> Result<SearchResult, Error> {
        let key = query.cache_key();
        let outcome = self.cache.get_or_create(&key, || self.produce(query, &key)).await;

        match outcome {
            Ok(result) => Ok(result),
            Err(err) => {
                let err = Error::acquisition(err);
                tracing::error!(key = %key, error = %err, "search acquisition failed");
                Err(err)
            }
        }
    }

    /// Producer body: runs only on a cache miss.
    async fn produce(&self, query: &SearchQuery, key: &str) -> Result<SearchResult, Error> {
        let page = self
            .fetcher
            .fetch_results_page(query.keyword())
            .await
            .map_err(|e| stage_failure(key, "fetch", e))?;

        let links = extract_links(&page).map_err(|e| stage_failure(key, "extract", e))?;
        let mut positions =
            match_positions(&links, query.target_url()).map_err(|e| stage_failure(key, "match", e))?;

        if positions.is_empty() {
            // Sentinel: the target URL was not found on the page.
            positions.push(0);
        }

        let result = SearchResult {
            keyword: query.keyword().to_string(),
            target_url: query.target_url().to_string(),
            positions,
            searched_at: Utc::now(),
        };

        self.history
            .add(&result)
            .await
            .map_err(|e| stage_failure(key, "persist", e))
    }

    /// Past lookups for the pair, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` on blank arguments; repository errors
    /// propagate unchanged — this read path has no caching concern and no
    /// `AcquisitionFailed` translation.
    pub async fn query_history(&self, keyword: &str, target_url: &str) -> Result<Vec<SearchResult>, Error> {
        if keyword.trim().is_empty() || target_url.trim().is_empty() {
            return Err(Error::InvalidInput("keyword and URL must be provided".into()));
        }

        self.history.query_history(keyword, target_url).await
    }
}

/// Log a producer stage failure with its context and normalize it.
fn stage_failure(key: &str, stage: &str, cause: Error) -> Error {
    tracing::error!(key = %key, stage = stage, error = %cause, "acquisition stage failed");
    Error::acquisition(cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serves a fixed page and counts fetches.
    struct StubFetcher {
        page: String,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn new(page: &str) -> Arc<Self> {
            Arc::new(Self { page: page.to_string(), calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl SearchPageFetcher for StubFetcher {
        async fn fetch_results_page(&self, _keyword: &str) -> Result<String, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.page.clone())
        }
    }

    /// Fails the first fetch, serves the page afterwards.
    struct FlakyFetcher {
        page: String,
        calls: AtomicUsize,
    }

    impl FlakyFetcher {
        fn new(page: &str) -> Arc<Self> {
            Arc::new(Self { page: page.to_string(), calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait::async_trait]
    impl SearchPageFetcher for FlakyFetcher {
        async fn fetch_results_page(&self, _keyword: &str) -> Result<String, Error> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::FetchFailed("connection reset".into()))
            } else {
                Ok(self.page.clone())
            }
        }
    }

    const PAGE: &str = concat!(
        r#"<a href="/url?q=https://example.com/&sa=U">Example</a>"#,
        r#"<a href="/url?q=https://www.udemy.com/course/x&sa=U">Udemy</a>"#,
    );

    async fn service_with(fetcher: Arc<dyn SearchPageFetcher>) -> RankService {
        RankService::new(
            fetcher,
            MemoryCache::new(Duration::from_secs(60)),
            HistoryDb::open_in_memory().await.unwrap(),
        )
    }

    fn query(keyword: &str, url: &str) -> SearchQuery {
        SearchQuery::new(keyword, url).unwrap()
    }

    #[tokio::test]
    async fn test_acquire_returns_positions() {
        let fetcher = StubFetcher::new(PAGE);
        let service = service_with(fetcher.clone()).await;

        let result = service.acquire(&query("test", "https://example.com")).await.unwrap();

        assert_eq!(result.keyword, "test");
        assert_eq!(result.target_url, "https://example.com");
        assert_eq!(result.positions, vec![1]);
    }

    #[tokio::test]
    async fn test_acquire_persists_result() {
        let fetcher = StubFetcher::new(PAGE);
        let service = service_with(fetcher.clone()).await;

        service.acquire(&query("test", "https://example.com")).await.unwrap();

        let history = service.query_history("test", "https://example.com").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].positions, vec![1]);
    }

    #[tokio::test]
    async fn test_acquire_cached_within_ttl() {
        let fetcher = StubFetcher::new(PAGE);
        let service = service_with(fetcher.clone()).await;
        let query = query("test", "https://example.com");

        let first = service.acquire(&query).await.unwrap();
        let second = service.acquire(&query).await.unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(first, second);

        // The cached call persisted nothing new either.
        let history = service.query_history("test", "https://example.com").await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_acquire_distinct_queries_fetch_separately() {
        let fetcher = StubFetcher::new(PAGE);
        let service = service_with(fetcher.clone()).await;

        service.acquire(&query("test", "https://example.com")).await.unwrap();
        service.acquire(&query("Test", "https://example.com")).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_acquire_sentinel_when_not_found() {
        let fetcher = StubFetcher::new(PAGE);
        let service = service_with(fetcher.clone()).await;

        let result = service.acquire(&query("test", "https://absent.example.org")).await.unwrap();
        assert_eq!(result.positions, vec![0]);

        let history = service.query_history("test", "https://absent.example.org").await.unwrap();
        assert_eq!(history[0].positions, vec![0]);
    }

    #[tokio::test]
    async fn test_acquire_failure_surfaces_as_acquisition_failed() {
        let fetcher = FlakyFetcher::new(PAGE);
        let service = service_with(fetcher.clone()).await;

        let result = service.acquire(&query("test", "https://example.com")).await;
        assert!(matches!(result, Err(Error::AcquisitionFailed(_))));

        // Nothing was persisted for the failed attempt.
        let history = service.query_history("test", "https://example.com").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_acquire_failure_not_cached() {
        let fetcher = FlakyFetcher::new(PAGE);
        let service = service_with(fetcher.clone()).await;
        let query = query("test", "https://example.com");

        assert!(service.acquire(&query).await.is_err());

        // The failed producer left no cache entry, so the next call retries
        // and succeeds.
        let recovered = service.acquire(&query).await.unwrap();
        assert_eq!(recovered.positions, vec![1]);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_acquire_wraps_extract_failure() {
        // A blank page makes the extractor's input contract fail; the caller
        // still sees only AcquisitionFailed.
        let fetcher = StubFetcher::new("   ");
        let service = service_with(fetcher.clone()).await;

        let result = service.acquire(&query("test", "https://example.com")).await;
        assert!(matches!(result, Err(Error::AcquisitionFailed(_))));
    }

    #[tokio::test]
    async fn test_query_history_blank_arguments() {
        let fetcher = StubFetcher::new(PAGE);
        let service = service_with(fetcher.clone()).await;

        let result = service.query_history("", "https://example.com").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = service.query_history("test", "  ").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_query_history_newest_first() {
        let fetcher = StubFetcher::new(PAGE);
        let history = HistoryDb::open_in_memory().await.unwrap();
        let service = RankService::new(fetcher, MemoryCache::new(Duration::from_secs(60)), history.clone());

        let old = SearchResult {
            keyword: "test".into(),
            target_url: "https://example.com".into(),
            positions: vec![7],
            searched_at: Utc::now() - chrono::Duration::hours(1),
        };
        history.add(&old).await.unwrap();

        service.acquire(&query("test", "https://example.com")).await.unwrap();

        let results = service.query_history("test", "https://example.com").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].positions, vec![1]);
        assert_eq!(results[1].positions, vec![7]);
    }
}
