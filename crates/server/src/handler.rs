//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use crate::tools::search_history::{SearchHistoryParams, history_impl};
use crate::tools::search_rank::{SearchRankParams, rank_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use serptrack_client::RankService;

/// The main MCP server handler for serptrack.
#[derive(Clone)]
pub struct SerptrackServer {
    service: Arc<RankService>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SerptrackServer {
    /// Create a new server handler around an acquisition service.
    pub fn new(service: RankService) -> Self {
        Self { service: Arc::new(service), tool_router: Self::tool_router() }
    }

    /// Look up the positions of a URL in the results for a keyword.
    ///
    /// Served from the cache when an unexpired entry exists for the exact
    /// (keyword, URL) pair; otherwise fetches, parses, and persists.
    #[tool(
        description = "Look up the 1-based positions of a URL in the search results page for a keyword. Results are cached per (keyword, URL) pair; position 0 means the URL was not found."
    )]
    async fn search_rank(&self, params: Parameters<SearchRankParams>) -> Result<CallToolResult, McpError> {
        rank_impl(&self.service, params.0).await
    }

    /// List past lookups for a (keyword, URL) pair, newest first.
    #[tool(description = "List past rank lookups for a (keyword, URL) pair, newest first.")]
    async fn search_history(&self, params: Parameters<SearchHistoryParams>) -> Result<CallToolResult, McpError> {
        history_impl(&self.service, params.0).await
    }
}

impl ServerHandler for SerptrackServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "serptrack".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
