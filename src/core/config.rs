//! Configuration management for the bridge.
//!
//! All configuration is assembled here from environment variables or
//! defaults; no other module reads the environment.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::transport::HttpConfig;

/// Main configuration structure for the bridge.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub transport: HttpConfig,

    /// Upstream commerce API configuration.
    pub upstream: UpstreamConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for the upstream Supercommerce admin API.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the commerce backend.
    pub base_url: String,

    /// Bearer token for the admin API.
    pub api_key: Option<String>,
}

/// Custom Debug implementation to redact the credential from logs.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://storeapi.el-dokan.com".to_string(),
            api_key: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "supercommerce-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        if let Ok(base_url) = std::env::var("SUPERCOMMERCE_BASE_URL") {
            config.upstream.base_url = base_url;
        } else {
            warn!(
                "SUPERCOMMERCE_BASE_URL not set - using default base URL {}",
                config.upstream.base_url
            );
        }

        match std::env::var("SUPERCOMMERCE_API_API_KEY") {
            Ok(api_key) => config.upstream.api_key = Some(api_key),
            Err(_) => warn!("SUPERCOMMERCE_API_API_KEY not set - upstream calls will be unauthenticated"),
        }

        config
    }
}
