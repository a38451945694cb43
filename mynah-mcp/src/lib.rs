//! # Mynah MCP
//!
//! Model Context Protocol server for the Mynah meeting assistant.
//!
//! The server speaks JSON-RPC 2.0 over a [`transport::Transport`] and exposes
//! the crate's tool registry to MCP hosts. One message in, at most one
//! message out; notifications get none.
//!
//! ```text
//! Host <-> Transport (stdio/channel) <-> McpServer <-> RequestHandler
//!                                                      +-- ToolRegistry
//! ```

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod transport;

use std::sync::Arc;

use mynah_tools::registry::ToolRegistry;
use tracing::{debug, error, info, warn};

use error::McpError;
use handlers::RequestHandler;
use protocol::{IncomingMessage, JsonRpcResponse, RequestId};
use transport::Transport;

/// The MCP server: a message loop around a [`RequestHandler`].
pub struct McpServer {
    handler: RequestHandler,
}

impl McpServer {
    pub fn new(tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            handler: RequestHandler::new(tool_registry),
        }
    }

    /// Process messages from the transport until EOF or a read error.
    ///
    /// Handler errors never break the loop; they are sent back to the client
    /// as JSON-RPC error responses.
    pub async fn run<T: Transport>(&mut self, transport: &mut T) -> Result<(), McpError> {
        info!("MCP server starting");

        loop {
            let message = match transport.read_message().await {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    info!("Transport closed (EOF), shutting down MCP server");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Transport read error");
                    break;
                }
            };

            if message.trim().is_empty() {
                continue;
            }

            debug!(message = %message, "Received MCP message");

            match self.process_message(&message).await {
                Ok(Some(response)) => {
                    let response_json =
                        serde_json::to_string(&response).map_err(|e| McpError::InternalError {
                            message: format!("Failed to serialize response: {e}"),
                        })?;
                    debug!(response = %response_json, "Sending MCP response");
                    transport.write_message(&response_json).await?;
                }
                Ok(None) => {
                    // Notification, nothing to send back.
                }
                Err(e) => {
                    error!(error = %e, "Error processing MCP message");
                    let error_response = JsonRpcResponse::from_mcp_error(RequestId::Null, e);
                    let error_json =
                        serde_json::to_string(&error_response).unwrap_or_else(|_| {
                            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#
                                .to_string()
                        });
                    transport.write_message(&error_json).await?;
                }
            }
        }

        transport.close().await?;
        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw JSON-RPC message.
    ///
    /// Returns `Some(response)` for requests and `None` for notifications.
    /// `Err` means the message itself was unusable (bad JSON, wrong version)
    /// and no request id could be attributed to it.
    async fn process_message(&mut self, raw: &str) -> Result<Option<JsonRpcResponse>, McpError> {
        let incoming: IncomingMessage =
            serde_json::from_str(raw).map_err(|e| McpError::ParseError {
                message: format!("Invalid JSON-RPC message: {e}"),
            })?;

        if incoming.jsonrpc != "2.0" {
            return Err(McpError::InvalidRequest {
                message: format!("Expected jsonrpc version 2.0, got: {}", incoming.jsonrpc),
            });
        }

        if incoming.is_notification() {
            debug!(method = %incoming.method, "Processing notification");
            if let Err(e) = self.handler.route(&incoming.method, incoming.params).await {
                // Notifications never get a response, not even for errors.
                warn!(method = %incoming.method, error = %e, "Notification handler error");
            }
            Ok(None)
        } else {
            let id = incoming.id.unwrap_or(RequestId::Null);
            debug!(method = %incoming.method, "Processing request");

            match self.handler.route(&incoming.method, incoming.params).await {
                Ok(result) => Ok(Some(JsonRpcResponse::success(id, result))),
                Err(e) => Ok(Some(JsonRpcResponse::from_mcp_error(id, e))),
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.handler.is_initialized()
    }
}
