//! MCP transport shim: binds list-tools and call-tool to the rmcp server.

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use tracing::{error, info};

use crate::bridge;
use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::orchestrator;
use crate::toolhouse::Toolhouse;

/// MCP server exposing one Toolhouse bundle. Stateless across requests;
/// the only long-lived state is the read-only configuration.
#[derive(Clone)]
pub struct ToolhouseServer {
    config: ServerConfig,
}

impl ToolhouseServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

impl ServerHandler for ToolhouseServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "toolhouse".to_string(),
                title: Some("Toolhouse".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Exposes the tools of a Toolhouse bundle; each tool call is \
                 executed through the configured LLM."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        let platform = Toolhouse::new(&self.config.toolhouse_api_key, &self.config.tool_provider);
        let tools = bridge::list_bundle_tools(&platform, &self.config.bundle_name)
            .await
            .map_err(to_mcp_error)?;

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.map(serde_json::Value::Object);
        let answer = orchestrator::call_tool(&self.config, &request.name, arguments.as_ref())
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(answer)]))
    }
}

fn to_mcp_error(e: ServerError) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

/// Serve MCP over stdio until the stream closes or the process is
/// terminated. Startup failure is fatal and never retried; request
/// failures leave the server alive.
pub async fn run(config: ServerConfig) -> Result<()> {
    info!(bundle = %config.bundle_name, "starting MCP server");

    let service = ToolhouseServer::new(config)
        .serve(stdio())
        .await
        .map_err(|e| {
            error!(error = %e, "server failed to start");
            ServerError::Startup(e.to_string())
        })?;

    service
        .waiting()
        .await
        .map_err(|e| ServerError::Startup(e.to_string()))?;
    Ok(())
}
