//! search_history tool implementation.
//!
//! Reads past lookups for a (keyword, URL) pair. This path never touches
//! the cache or the network.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serptrack_client::RankService;
use serptrack_core::{Error, SearchQuery, SearchResult};

/// Input parameters for search_history tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchHistoryParams {
    /// Search keyword (1-100 characters).
    pub keyword: String,

    /// Target URL the history was recorded for (absolute http(s) URL).
    pub url: String,
}

/// Output structure for search_history tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchHistoryOutput {
    /// Past lookups, newest first.
    pub results: Vec<SearchResult>,
}

/// Implementation of the search_history tool.
pub async fn history_impl(service: &RankService, params: SearchHistoryParams) -> Result<CallToolResult, McpError> {
    let query = SearchQuery::new(&params.keyword, &params.url)?;

    let results = service.query_history(query.keyword(), query.target_url()).await?;

    let output = SearchHistoryOutput { results };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("failed to serialize history: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
