//! Bridge server - registration phase and the protocol surface.
//!
//! `BridgeServer::new` runs the one-time registration phase: the tool
//! manifest is loaded, parameter schemas are translated, and the registry is
//! frozen behind an `Arc` before any transport starts serving. At runtime the
//! server only reads that state, so it is cheap to clone into connection
//! handlers.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::info;

use super::config::Config;
use super::error::Result;
use crate::domains::resources::ResourceService;
use crate::domains::tools::{
    CallEnvelope, Dispatcher, ToolRegistry, Upstream, definitions, register_manifest,
};

/// MCP protocol revision this bridge speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// The bridge server: frozen registry, dispatcher, and resource table.
#[derive(Clone)]
pub struct BridgeServer {
    config: Arc<Config>,
    dispatcher: Dispatcher,
    resources: Arc<ResourceService>,
}

impl BridgeServer {
    /// Run the registration phase and assemble the server.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let upstream = Arc::new(Upstream::new(&config.upstream));

        let manifest = definitions::manifest();
        let mut registry = ToolRegistry::new();
        let registered = register_manifest(&mut registry, &manifest, upstream);
        info!("Registered {}/{} tools", registered, manifest.len());

        Self {
            dispatcher: Dispatcher::new(Arc::new(registry)),
            resources: Arc::new(ResourceService::new()),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The `initialize` result advertised to clients.
    pub fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": self.name(),
                "version": self.version()
            }
        })
    }

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Value> {
        self.dispatcher.registry().list()
    }

    /// Dispatch a tool call and return the content envelope.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallEnvelope {
        self.dispatcher.dispatch(name, arguments).await
    }

    /// List all available resources.
    pub fn list_resources(&self) -> Vec<Value> {
        self.resources.list_resources()
    }

    /// List all available resource templates.
    pub fn list_resource_templates(&self) -> Vec<Value> {
        self.resources.list_resource_templates()
    }

    /// Read a resource by URI.
    pub fn read_resource(&self, uri: &str) -> Result<Value> {
        Ok(self.resources.read_resource(uri)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_registers_manifest() {
        let server = BridgeServer::new(Config::default());
        let tools = server.list_tools();
        assert!(!tools.is_empty());

        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert!(names.contains(&"login"));
        assert!(names.contains(&"view-order"));
        assert!(names.contains(&"list-orders"));
    }

    #[test]
    fn test_initialize_result_shape() {
        let server = BridgeServer::new(Config::default());
        let result = server.initialize_result();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "supercommerce-mcp-server");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_call_tool_validation_path() {
        let server = BridgeServer::new(Config::default());
        // Missing required `id`: validation rejects before any network call.
        let envelope = server.call_tool("view-order", json!({})).await;
        assert!(envelope.is_error());
    }
}
