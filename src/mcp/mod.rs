//! MCP server exposing one blueprint as one tool over stdio.
//!
//! StudioServer -> ServerHandler { get_info, list_tools, call_tool }
//! serve_stdio  -> run until the client disconnects.
//!
//! Render validation failures are tool results with `is_error = true`,
//! never protocol errors, so a bad call cannot take the server down.
//!
use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    transport::stdio,
};

use crate::blueprint::Blueprint;
use crate::cmd::exec::run_command;

/// Server name reported during initialization.
pub const SERVER_NAME: &str = "studio-mcp";

/// The single-tool MCP server.
#[derive(Debug, Clone)]
pub struct StudioServer {
    blueprint: Arc<Blueprint>,
}

impl StudioServer {
    pub fn new(blueprint: Blueprint) -> Self {
        Self {
            blueprint: Arc::new(blueprint),
        }
    }

    /// Tool definition advertised by `tools/list`.
    pub fn tool(&self) -> Tool {
        Tool::new(
            self.blueprint.tool_name().to_string(),
            self.blueprint.tool_description(),
            Arc::new(self.blueprint.input_schema()),
        )
    }

    /// Handle one `tools/call`.
    ///
    /// Unknown tool names are protocol errors; everything else becomes a
    /// tool result.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        if name != self.blueprint.tool_name() {
            tracing::warn!("unknown tool requested: {name}");
            return Err(McpError::invalid_params(
                format!("unknown tool: {name}"),
                None,
            ));
        }

        let arguments = arguments.unwrap_or_default();
        tracing::debug!("tool called with args: {}", serde_json::Value::Object(arguments.clone()));

        let argv = match self.blueprint.render(&arguments) {
            Ok(argv) => argv,
            Err(e) => {
                tracing::debug!("validation error: {e}");
                return Ok(CallToolResult::error(vec![Content::text(format!(
                    "Validation error: {e}"
                ))]));
            }
        };

        tracing::debug!("built command: {}", shell_words::join(&argv));

        let outcome = run_command(&argv).await;
        let text = outcome.display_text();

        if outcome.is_success() {
            Ok(CallToolResult::success(vec![Content::text(text)]))
        } else {
            if let Some(message) = outcome.failure_message() {
                tracing::debug!("execution error: {message}");
            }
            Ok(CallToolResult::error(vec![Content::text(text)]))
        }
    }
}

impl ServerHandler for StudioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "Single tool `{}`: {}",
                self.blueprint.tool_name(),
                self.blueprint.tool_description()
            )),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: vec![self.tool()],
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(&request.name, request.arguments).await
    }
}

/// Serve `blueprint` over stdin/stdout until the client goes away.
pub async fn serve_stdio(blueprint: Blueprint) -> Result<()> {
    let server = StudioServer::new(blueprint);
    tracing::info!("serving tool '{}' over stdio", server.blueprint.tool_name());

    let service = server
        .serve(stdio())
        .await
        .context("Failed to initialize MCP stdio transport")?;

    let reason = service.waiting().await.context("MCP server task failed")?;
    tracing::debug!("server stopped: {reason:?}");
    Ok(())
}
