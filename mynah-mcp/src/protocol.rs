//! JSON-RPC 2.0 and MCP wire types.
//!
//! Everything the server reads or writes on a transport is defined here.
//! Field names follow the MCP schema, which uses camelCase on the wire.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::McpError;

/// The MCP protocol revision this server implements.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 core types
// ---------------------------------------------------------------------------

/// A JSON-RPC request id: integer, string, or null, transmitted bare.
///
/// Custom serde impls keep the JSON untagged; a derived enum would wrap the
/// value in a variant object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestId {
    Number(i64),
    String(String),
    /// Allowed by JSON-RPC 2.0, discouraged in practice. Also used for
    /// error responses to messages whose id could not be recovered.
    Null,
}

impl Serialize for RequestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RequestId::Number(n) => serializer.serialize_i64(*n),
            RequestId::String(s) => serializer.serialize_str(s),
            RequestId::Null => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(RequestId::Number)
                .ok_or_else(|| serde::de::Error::custom("request id number must be an integer")),
            Value::String(s) => Ok(RequestId::String(s)),
            Value::Null => Ok(RequestId::Null),
            _ => Err(serde::de::Error::custom(
                "request id must be a number, string, or null",
            )),
        }
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// The error member of a JSON-RPC error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC 2.0 response carrying exactly one of `result` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    pub id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: RequestId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Error response with the code and message taken from an [`McpError`].
    pub fn from_mcp_error(id: RequestId, err: McpError) -> Self {
        Self::error(
            id,
            JsonRpcError {
                code: err.error_code(),
                message: err.to_string(),
                data: None,
            },
        )
    }
}

/// A JSON-RPC 2.0 notification, which is a request without an `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// An incoming message before the server knows whether it is a request or a
/// notification. `params` defaults to [`Value::Null`] when absent so routing
/// can pass it on without an Option dance.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    /// Present for requests, absent for notifications.
    #[serde(default)]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl IncomingMessage {
    /// A message without an id is a notification and gets no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

// ---------------------------------------------------------------------------
// MCP initialization types
// ---------------------------------------------------------------------------

/// Parameters of the client's `initialize` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: ClientCapabilities,
    pub client_info: ClientInfo,
}

/// Identity of the connecting client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Capabilities advertised by the client. Empty for now.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientCapabilities {}

/// The server's reply to `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

/// Identity of this server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Capabilities advertised by the server. This server only exposes tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Capability descriptor for the tools subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the server may send `notifications/tools/listChanged`.
    /// The tool set here is fixed at startup, so this is always false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

// ---------------------------------------------------------------------------
// MCP tool types
// ---------------------------------------------------------------------------

/// One tool entry in a `tools/list` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's arguments.
    pub input_schema: Value,
}

/// Result for `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<McpTool>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// Result of a `tools/call` invocation.
///
/// Tool failures are reported here with `is_error: Some(true)` rather than
/// as JSON-RPC errors, so the calling model sees the failure text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// A content block inside a tool result. Every Mynah tool renders text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_id_variants_stay_bare_on_the_wire() {
        assert_eq!(serde_json::to_value(RequestId::Number(7)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(RequestId::String("r-1".into())).unwrap(),
            json!("r-1")
        );
        assert_eq!(serde_json::to_value(RequestId::Null).unwrap(), json!(null));

        let id: RequestId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id, RequestId::Number(42));
        let id: RequestId = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(id, RequestId::String("abc".into()));
        let id: RequestId = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(id, RequestId::Null);
    }

    #[test]
    fn request_id_rejects_non_scalar_values() {
        assert!(serde_json::from_value::<RequestId>(json!([1])).is_err());
        assert!(serde_json::from_value::<RequestId>(json!(1.5)).is_err());
    }

    #[test]
    fn success_response_omits_the_error_member() {
        let resp = JsonRpcResponse::success(RequestId::Number(1), json!({"tools": []}));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 1);
        assert!(value.get("error").is_none());
        assert_eq!(value["result"], json!({"tools": []}));
    }

    #[test]
    fn error_response_omits_the_result_member() {
        let resp = JsonRpcResponse::from_mcp_error(
            RequestId::String("req-9".into()),
            McpError::MethodNotFound {
                method: "tools/run".into(),
            },
        );
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("result").is_none());
        assert_eq!(value["error"]["code"], -32601);
        assert!(
            value["error"]["message"]
                .as_str()
                .unwrap()
                .contains("tools/run")
        );
    }

    #[test]
    fn incoming_message_distinguishes_notifications() {
        let request: IncomingMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/list"
        }))
        .unwrap();
        assert!(!request.is_notification());
        // params defaults to null when absent.
        assert!(request.params.is_null());

        let notification: IncomingMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .unwrap();
        assert!(notification.is_notification());
    }

    #[test]
    fn initialize_types_use_camel_case() {
        let params: InitializeParams = serde_json::from_value(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "inspector"}
        }))
        .unwrap();
        assert_eq!(params.protocol_version, MCP_PROTOCOL_VERSION);
        assert_eq!(params.client_info.name, "inspector");
        assert!(params.client_info.version.is_none());

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: "mynah".to_string(),
                version: "0.4.1".to_string(),
            },
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["protocolVersion"], "2024-11-05");
        assert_eq!(value["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(value["serverInfo"]["name"], "mynah");
    }

    #[test]
    fn mcp_tool_serializes_input_schema_camel_cased() {
        let tool = McpTool {
            name: "list_meetings".into(),
            description: Some("List recorded meetings".into()),
            input_schema: json!({"type": "object", "properties": {}}),
        };
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["inputSchema"]["type"], "object");
        assert!(value.get("input_schema").is_none());
    }

    #[test]
    fn call_tool_result_tags_text_content() {
        let result = CallToolResult {
            content: vec![ToolContent::Text {
                text: "done".into(),
            }],
            is_error: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "done");
        assert!(value.get("isError").is_none());

        let failed = CallToolResult {
            content: vec![ToolContent::Text {
                text: "Error: boom".into(),
            }],
            is_error: Some(true),
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["isError"], true);
    }

    #[test]
    fn call_tool_params_allow_missing_arguments() {
        let params: CallToolParams =
            serde_json::from_value(json!({"name": "list_teams"})).unwrap();
        assert_eq!(params.name, "list_teams");
        assert!(params.arguments.is_none());
    }
}
