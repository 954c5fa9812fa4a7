//! Tool Registry - the name-to-descriptor table dispatch resolves against.
//!
//! The registry is an explicit value built during the registration phase and
//! frozen behind an `Arc` before any transport starts serving. Registration
//! is its only mutation; afterwards it is read concurrently without locking.

use std::collections::HashMap;

use serde_json::{Value, json};

use super::error::ToolError;
use super::loader::ToolDescriptor;

/// Mapping from derived tool name to descriptor. Names are unique; a second
/// registration for the same name is rejected and the first wins.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its derived name.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), ToolError> {
        if self.tools.contains_key(&descriptor.name) {
            return Err(ToolError::Duplicate(descriptor.name));
        }
        self.tools.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Look up a descriptor by name.
    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool metadata for `tools/list`.
    pub fn list(&self) -> Vec<Value> {
        let mut tools: Vec<&ToolDescriptor> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
            .into_iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "title": t.title,
                    "description": t.description,
                    "inputSchema": t.parameters,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::loader::{ApiTool, ToolDefinition, load, ManifestEntry};
    use crate::domains::tools::upstream::Upstream;
    use crate::core::config::UpstreamConfig;
    use futures::FutureExt;
    use std::sync::Arc;

    fn descriptor(path: &'static str) -> ToolDescriptor {
        fn factory(_: Arc<Upstream>) -> Result<ApiTool, crate::domains::tools::error::LoadError> {
            Ok(ApiTool {
                definition: ToolDefinition {
                    name: "declared_name".to_string(),
                    description: "test tool".to_string(),
                    parameters: serde_json::json!({ "type": "object", "properties": {} }),
                },
                handler: Arc::new(|_| async { Ok(serde_json::json!(null)) }.boxed()),
            })
        }
        let entry = ManifestEntry { path, factory };
        load(&entry, Arc::new(Upstream::new(&UpstreamConfig::default()))).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("x/login.js")).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("login").is_some());
        assert!(registry.lookup("unknown").is_none());
    }

    #[test]
    fn test_duplicate_rejected_first_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("v1/login.js")).unwrap();

        let err = registry.register(descriptor("v2/login.js")).unwrap_err();
        assert!(matches!(err, ToolError::Duplicate(name) if name == "login"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_metadata_shape() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("x/view-order.js")).unwrap();

        let listed = registry.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["name"], "view-order");
        assert_eq!(listed[0]["title"], "declared_name");
        assert!(listed[0]["inputSchema"]["type"] == "object");
    }
}
