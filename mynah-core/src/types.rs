//! Shared types for the tool layer.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Description of a tool as advertised to MCP clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name, e.g. `list_meetings`.
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// JSON Schema for the tool's arguments.
    pub parameters: serde_json::Value,
}

/// How much damage a tool can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Reads remote state, changes nothing.
    ReadOnly,
    /// Creates or modifies remote state.
    Write,
    /// Permanently deletes remote state.
    Destructive,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::ReadOnly => "read-only",
            RiskLevel::Write => "write",
            RiskLevel::Destructive => "destructive",
        };
        write!(f, "{s}")
    }
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Primary text payload returned to the caller.
    pub content: String,
    /// Auxiliary data about the execution.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolOutput {
    /// Successful output with plain text content.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Failed output; the message is what the caller sees.
    pub fn error(message: impl Into<String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("is_error".to_string(), serde_json::Value::Bool(true));
        Self {
            content: message.into(),
            metadata,
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_error(&self) -> bool {
        self.metadata
            .get("is_error")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// Output encoding selected by the caller of a read tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Markdown,
    Json,
}

impl ResponseFormat {
    /// Parse the wire value. Anything other than the two known encodings is
    /// rejected rather than silently defaulted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "markdown" => Some(ResponseFormat::Markdown),
            "json" => Some(ResponseFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Markdown => "markdown",
            ResponseFormat::Json => "json",
        }
    }
}
