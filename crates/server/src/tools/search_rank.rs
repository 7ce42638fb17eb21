//! search_rank tool implementation.
//!
//! Runs one rank lookup through the acquisition service.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serptrack_client::RankService;
use serptrack_core::{Error, SearchQuery, SearchResult};

/// Input parameters for search_rank tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchRankParams {
    /// Search keyword (1-100 characters).
    pub keyword: String,

    /// Target URL to locate in the results (absolute http(s) URL).
    pub url: String,
}

/// Output structure for search_rank tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchRankOutput {
    /// The completed (possibly cached) lookup.
    pub result: SearchResult,
}

/// Implementation of the search_rank tool.
pub async fn rank_impl(service: &RankService, params: SearchRankParams) -> Result<CallToolResult, McpError> {
    let query = SearchQuery::new(&params.keyword, &params.url)?;

    let result = service.acquire(&query).await?;

    let output = SearchRankOutput { result };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("failed to serialize result: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
