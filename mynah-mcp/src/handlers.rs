//! Routing of JSON-RPC methods to their MCP handlers.

use std::sync::Arc;

use mynah_tools::registry::ToolRegistry;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::McpError;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, ListToolsResult, McpTool,
    ServerCapabilities, ServerInfo, ToolContent, ToolsCapability, MCP_PROTOCOL_VERSION,
};

/// Dispatches MCP requests against the tool registry.
///
/// Everything except `initialize` is rejected until a client has
/// initialized the session.
pub struct RequestHandler {
    tool_registry: Arc<ToolRegistry>,
    initialized: bool,
    server_info: ServerInfo,
}

impl RequestHandler {
    pub fn new(tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            tool_registry,
            initialized: false,
            server_info: ServerInfo {
                name: "mynah".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Handle `initialize`.
    pub fn handle_initialize(&mut self, params: InitializeParams) -> Result<Value, McpError> {
        info!(
            client = %params.client_info.name,
            client_version = ?params.client_info.version,
            protocol_version = %params.protocol_version,
            "MCP client connecting"
        );

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: self.server_info.clone(),
        };

        serde_json::to_value(result).map_err(|e| McpError::InternalError {
            message: format!("Failed to serialize initialize result: {e}"),
        })
    }

    /// Handle the `notifications/initialized` notification.
    pub fn handle_initialized(&self) {
        info!("MCP client initialized successfully");
    }

    /// Handle `tools/list`.
    pub fn handle_tools_list(&self) -> Result<Value, McpError> {
        if !self.initialized {
            return Err(McpError::NotInitialized);
        }

        let tools: Vec<McpTool> = self
            .tool_registry
            .list_definitions()
            .into_iter()
            .map(|def| McpTool {
                name: def.name,
                description: Some(def.description),
                input_schema: def.parameters,
            })
            .collect();

        debug!(count = tools.len(), "Listing tools");

        serde_json::to_value(ListToolsResult { tools }).map_err(|e| McpError::InternalError {
            message: format!("Failed to serialize tools list: {e}"),
        })
    }

    /// Handle `tools/call`.
    ///
    /// Tool failures are not JSON-RPC errors: they come back as a successful
    /// response whose result carries `isError: true` and the failure text,
    /// so the calling model can read and react to the message. Only an
    /// unknown tool name is a protocol-level error.
    pub async fn handle_tools_call(&self, params: CallToolParams) -> Result<Value, McpError> {
        if !self.initialized {
            return Err(McpError::NotInitialized);
        }

        let tool_name = &params.name;
        let arguments = params
            .arguments
            .unwrap_or(Value::Object(Default::default()));

        info!(tool = %tool_name, "Calling tool via MCP");
        debug!(tool = %tool_name, args = %arguments, "Tool call arguments");

        if self.tool_registry.get(tool_name).is_none() {
            return Err(McpError::ToolError {
                message: format!("Tool not found: {tool_name}"),
            });
        }

        let result = match self.tool_registry.execute(tool_name, arguments).await {
            Ok(output) => {
                let is_error = output.is_error();
                CallToolResult {
                    content: vec![ToolContent::Text {
                        text: output.content,
                    }],
                    is_error: if is_error { Some(true) } else { None },
                }
            }
            Err(e) => {
                warn!(tool = %tool_name, error = %e, "Tool execution failed");
                CallToolResult {
                    content: vec![ToolContent::Text {
                        text: format!("Error: {e}"),
                    }],
                    is_error: Some(true),
                }
            }
        };

        serde_json::to_value(result).map_err(|e| McpError::InternalError {
            message: format!("Failed to serialize tool result: {e}"),
        })
    }

    /// Route a method name to its handler.
    pub async fn route(&mut self, method: &str, params: Value) -> Result<Value, McpError> {
        match method {
            "initialize" => {
                let init_params: InitializeParams =
                    serde_json::from_value(params).map_err(|e| McpError::InvalidParams {
                        message: format!("Invalid initialize params: {e}"),
                    })?;
                self.handle_initialize(init_params)
            }
            "notifications/initialized" => {
                self.handle_initialized();
                Ok(Value::Null)
            }
            "tools/list" => self.handle_tools_list(),
            "tools/call" => {
                let call_params: CallToolParams =
                    serde_json::from_value(params).map_err(|e| McpError::InvalidParams {
                        message: format!("Invalid tools/call params: {e}"),
                    })?;
                self.handle_tools_call(call_params).await
            }
            _ => Err(McpError::MethodNotFound {
                method: method.to_string(),
            }),
        }
    }
}
