//! Error types for the Mynah MCP server.
//!
//! Every failure mode of an outbound API call maps onto exactly one
//! [`ApiError`] variant, so tool output carries one predictable message per
//! failure class instead of raw transport noise.

use thiserror::Error;

/// Errors from talking to the Mynah API.
///
/// HTTP statuses and transport failures are classified once, in the client,
/// and everything downstream only ever sees these variants.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400: the request itself was malformed or had invalid parameters.
    #[error("Mynah API rejected the request: {message}")]
    InvalidRequest { message: String },

    /// 401: missing or invalid API key.
    #[error("Mynah API authentication failed: the API key is missing or invalid (check MYNAH_API_KEY)")]
    AuthenticationFailed,

    /// 403: the key is valid but not allowed to touch this resource.
    #[error("Mynah API denied access: the API key lacks permission for this resource")]
    Forbidden,

    /// 404: no resource matches the requested identifier.
    #[error("Mynah API returned not found: {resource}")]
    NotFound { resource: String },

    /// 429: the per-key request quota is exhausted.
    #[error("Mynah API rate limit exceeded{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// 5xx: the service itself is failing.
    #[error("Mynah API is temporarily unavailable (HTTP {status}), try again later")]
    RemoteUnavailable { status: u16 },

    /// The request exceeded the configured deadline.
    #[error("request to the Mynah API timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// DNS failure, connection refused, or no route to the host.
    #[error("could not reach the Mynah API: {message}")]
    NetworkUnreachable { message: String },

    /// Anything that slipped through the classes above.
    #[error("unexpected Mynah API error: {message}")]
    Unknown { message: String },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(", retry after {secs}s"),
        None => String::new(),
    }
}

impl ApiError {
    /// Whether a retry at a later time could plausibly succeed.
    ///
    /// The server never retries on its own; this only informs the wording
    /// surfaced to the model.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimited { .. }
                | ApiError::RemoteUnavailable { .. }
                | ApiError::Timeout { .. }
                | ApiError::NetworkUnreachable { .. }
        )
    }
}

/// Errors from tool registration and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    #[error("Tool already registered: {name}")]
    AlreadyRegistered { name: String },

    #[error("Invalid arguments for tool '{name}': {reason}")]
    InvalidArguments { name: String, reason: String },

    #[error("Tool '{name}' execution failed: {message}")]
    ExecutionFailed { name: String, message: String },

    #[error("Tool '{name}' timed out after {timeout_secs}s")]
    Timeout { name: String, timeout_secs: u64 },

    /// API failures pass through untouched so the taxonomy message survives
    /// all the way to the tool caller.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "MYNAH_API_KEY is not set. Generate a key under Settings > Integrations > API \
         in Mynah, then export MYNAH_API_KEY or add it to a .env file"
    )]
    MissingApiKey,

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}
