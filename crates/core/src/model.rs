//! Domain model: the search query input and the persisted search result.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Separator between keyword and target URL in cache keys.
const KEY_SEPARATOR: char = '_';

/// Maximum accepted keyword length in characters.
const MAX_KEYWORD_CHARS: usize = 100;

/// A validated (keyword, target URL) pair.
///
/// Immutable once constructed. Both fields are kept exactly as supplied —
/// no trimming, case folding, or URL normalization — so two queries that
/// differ only in casing or a trailing slash are distinct cache entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keyword: String,
    target_url: String,
}

impl SearchQuery {
    /// Validate and construct a query.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the keyword is blank or longer than
    /// 100 characters, or if the target URL is not a well-formed absolute
    /// http(s) URL.
    pub fn new(keyword: &str, target_url: &str) -> Result<Self, Error> {
        if keyword.trim().is_empty() {
            return Err(Error::InvalidInput("keyword cannot be empty".into()));
        }
        if keyword.chars().count() > MAX_KEYWORD_CHARS {
            return Err(Error::InvalidInput(format!(
                "keyword too long: must be between 1 and {} characters",
                MAX_KEYWORD_CHARS
            )));
        }

        let parsed = url::Url::parse(target_url)
            .map_err(|e| Error::InvalidInput(format!("invalid target URL: {}", e)))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::InvalidInput(format!("invalid target URL: unsupported scheme: {}", scheme)));
            }
        }

        Ok(Self { keyword: keyword.to_string(), target_url: target_url.to_string() })
    }

    /// The search keyword, exactly as supplied.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The target URL, exactly as supplied.
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Deterministic cache key: `keyword` + `_` + `target_url`, verbatim.
    pub fn cache_key(&self) -> String {
        format!("{}{}{}", self.keyword, KEY_SEPARATOR, self.target_url)
    }
}

/// One completed rank lookup.
///
/// `positions` holds the 1-based ordinals of the links that matched the
/// target URL, ascending. It is never empty: the single sentinel value `0`
/// means the target was not found in the fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    /// The keyword that was searched.
    pub keyword: String,
    /// The URL whose ranks were looked up.
    pub target_url: String,
    /// 1-based ranks, ascending; `[0]` when not found.
    pub positions: Vec<u32>,
    /// When the lookup ran (UTC).
    pub searched_at: DateTime<Utc>,
}
