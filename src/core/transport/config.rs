//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port number to listen on.
    pub port: u16,

    /// Path for the unary JSON-RPC endpoint.
    pub rpc_path: String,

    /// Path for the persistent SSE stream endpoint.
    pub sse_path: String,

    /// Path session-correlated messages are POSTed to.
    pub messages_path: String,

    /// Enable CORS for browser clients.
    pub enable_cors: bool,

    /// Keepalive comment interval for SSE sessions, in seconds.
    pub keepalive_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            rpc_path: "/mcp".to_string(),
            sse_path: "/sse".to_string(),
            messages_path: "/messages".to_string(),
            enable_cors: true,
            keepalive_secs: 25,
        }
    }
}

impl HttpConfig {
    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("MCP_HTTP_HOST") {
            config.host = host;
        }

        // Plain PORT is honored for platform deploys; MCP_HTTP_PORT wins if
        // both are set.
        if let Some(port) = std::env::var("MCP_HTTP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
        {
            config.port = port;
        }

        if let Ok(path) = std::env::var("MCP_HTTP_PATH") {
            config.rpc_path = path;
        }

        if let Ok(cors) = std::env::var("MCP_HTTP_CORS") {
            config.enable_cors = cors.to_lowercase() != "false" && cors != "0";
        }

        if let Some(secs) = std::env::var("MCP_SSE_KEEPALIVE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.keepalive_secs = secs;
        }

        config
    }

    /// The socket address to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        format!(
            "HTTP on {} (rpc {}, stream {}, messages {})",
            self.address(),
            self.rpc_path,
            self.sse_path,
            self.messages_path
        )
    }
}
