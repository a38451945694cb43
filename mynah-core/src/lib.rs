//! # Mynah Core
//!
//! Shared foundation for the Mynah MCP server: configuration loading, the
//! API error taxonomy, wire data models, and tool-facing types.

pub mod config;
pub mod error;
pub mod models;
pub mod types;

pub use config::{load_config, MynahConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ConfigError, ToolError};
pub use types::{ResponseFormat, RiskLevel, ToolDefinition, ToolOutput};
