//! HTTP fetch of the search results page.
//!
//! One outbound GET per lookup: the configured base URL with the keyword
//! percent-encoded and appended. Any non-success status, timeout, network
//! failure, or over-size body is a fetch failure; the distinctions only
//! matter for logging, the acquisition boundary collapses them all.

use std::time::{Duration, Instant};

use serptrack_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Results-page URL prefix the encoded keyword is appended to.
    pub base_url: String,

    /// User agent string (default: "serptrack/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/search?num=100&q=".to_string(),
            user_agent: "serptrack/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.search_base_url.clone(),
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
        }
    }
}

/// The seam the acquisition service fetches results pages through.
#[async_trait::async_trait]
pub trait SearchPageFetcher: Send + Sync {
    /// Fetch the raw results-page markup for a keyword.
    async fn fetch_results_page(&self, keyword: &str) -> Result<String, Error>;
}

/// HTTP fetch client for the upstream search endpoint.
pub struct FetchClient {
    http: reqwest::Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn results_url(&self, keyword: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(keyword.as_bytes()).collect();
        format!("{}{}", self.config.base_url, encoded)
    }
}

#[async_trait::async_trait]
impl SearchPageFetcher for FetchClient {
    async fn fetch_results_page(&self, keyword: &str) -> Result<String, Error> {
        let start = Instant::now();
        let url = self.results_url(keyword);

        let response = self
            .http
            .get(&url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("request timed out after {:?}", self.config.timeout))
                } else {
                    Error::FetchFailed(format!("network error: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                len, self.config.max_bytes
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::FetchFailed(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        tracing::debug!(
            "fetched results page for {:?} in {}ms ({} bytes)",
            keyword,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
