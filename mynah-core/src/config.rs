//! Configuration for the Mynah MCP server.
//!
//! Layered via figment: built-in defaults overridden by `MYNAH_`-prefixed
//! environment variables. MCP clients pass configuration through the `env`
//! block of their server config, so there is no config file layer.

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Production endpoint of the Mynah external API.
pub const DEFAULT_BASE_URL: &str = "https://api.mynah.dev/external/v1";

/// Runtime configuration, typically loaded from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MynahConfig {
    /// API key sent as `X-Api-Key` on every request (`MYNAH_API_KEY`).
    pub api_key: String,
    /// Base URL of the Mynah API (`MYNAH_BASE_URL`).
    pub base_url: String,
    /// Total per-request deadline in seconds (`MYNAH_TIMEOUT_SECS`).
    pub timeout_secs: u64,
    /// TCP connect deadline in seconds (`MYNAH_CONNECT_TIMEOUT_SECS`).
    pub connect_timeout_secs: u64,
}

impl Default for MynahConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Load configuration from defaults plus `MYNAH_`-prefixed environment
/// variables.
///
/// Fails with an actionable message when no API key is set, since nothing
/// useful works without one.
pub fn load_config() -> Result<MynahConfig, ConfigError> {
    let config: MynahConfig = Figment::from(Serialized::defaults(MynahConfig::default()))
        .merge(Env::prefixed("MYNAH_"))
        .extract()
        .map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })?;

    if config.api_key.trim().is_empty() {
        return Err(ConfigError::MissingApiKey);
    }

    Ok(config)
}
