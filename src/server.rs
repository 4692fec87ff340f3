//! MCP server exposing the search index as tools.

use crate::state::IndexState;
use crate::tools::lookup::{LookupRequest, handle_lookup};
use crate::tools::reload::{ReloadRequest, handle_reload};
use crate::tools::search::{SearchRequest, handle_search};
use crate::tools::stats::handle_index_stats;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for documentation search queries
#[derive(Clone)]
pub struct SearchServer {
    /// Shared index state (active index, loader)
    state: Arc<IndexState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl SearchServer {
    /// Create a new SearchServer over shared index state.
    pub fn new(state: Arc<IndexState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Full-text search over the documentation index. Matches whole words in entry titles and text (title matches weigh more) and returns ranked entries with their location and a text snippet."
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(description = "Show the full documentation entry stored at a location (URL fragment).")]
    async fn lookup(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> std::result::Result<String, String> {
        handle_lookup(&self.state, request).await
    }

    #[tool(
        description = "Rebuild the search index from a search index file (or the current one). The previous index keeps serving if the new file is invalid."
    )]
    async fn reload_index(
        &self,
        Parameters(request): Parameters<ReloadRequest>,
    ) -> std::result::Result<String, String> {
        handle_reload(&self.state, request).await
    }

    #[tool(description = "Report the size and source of the currently served search index.")]
    async fn index_stats(&self) -> std::result::Result<String, String> {
        handle_index_stats(&self.state).await
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsearch: full-text search over a generated documentation site. \
                 Use search to find entries, lookup to read one in full, \
                 and reload_index after the site has been regenerated.",
            )
    }
}
