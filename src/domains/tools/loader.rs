//! Tool descriptor loading from the compiled-in manifest.
//!
//! Tool modules are not discovered at runtime; the manifest is an explicit
//! sequence of module identifiers paired with factory functions, and each
//! factory produces the uniform `{ definition, handler }` shape.
//!
//! Loading is independent per entry: a factory failure, an untranslatable
//! schema, or a duplicate derived name skips that entry with a warning and
//! the rest of the manifest still registers.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{info, warn};

use super::error::{LoadError, ToolError};
use super::registry::ToolRegistry;
use super::schema::{ValidatorNode, translate_parameters};
use super::upstream::Upstream;

/// An invocable tool handler: `(args) -> result | {error}`.
///
/// Handlers are opaque to the core; internal failures are expected to surface
/// as an `{error}`-shaped `Ok` value, and an `Err` is still recoverable.
pub type ToolHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync>;

/// Factory producing a tool from its module; the manifest-side analog of a
/// dynamic import.
pub type ToolFactory = fn(Arc<Upstream>) -> Result<ApiTool, LoadError>;

/// Declarative tool metadata as exported by a tool module.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// The tool's own declared name (becomes the descriptor title).
    pub name: String,

    /// Human-readable description shown to clients.
    pub description: String,

    /// Declarative JSON-Schema-like parameter schema.
    pub parameters: Value,
}

/// The uniform export shape of a tool module.
pub struct ApiTool {
    pub definition: ToolDefinition,
    pub handler: ToolHandler,
}

/// One manifest entry: a module identifier and the factory that loads it.
pub struct ManifestEntry {
    /// Relative module identifier; the registry key is derived from its
    /// final path segment.
    pub path: &'static str,

    pub factory: ToolFactory,
}

/// A normalized tool record, owned by the registry once registered.
pub struct ToolDescriptor {
    /// Registry key, derived from the module path. Immutable.
    pub name: String,

    /// The declared tool name from the definition.
    pub title: String,

    pub description: String,

    /// The raw declarative schema, advertised via `tools/list`.
    pub parameters: Value,

    /// Validator built from `parameters` at registration time.
    pub validator: ValidatorNode,

    pub handler: ToolHandler,
}

/// Derive the registry key from a module identifier: the final path segment
/// with any implementation-file suffix stripped.
pub fn derive_tool_name(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    for suffix in [".js", ".ts", ".rs"] {
        if let Some(stem) = file_name.strip_suffix(suffix) {
            return stem.to_string();
        }
    }
    file_name.to_string()
}

/// Load a single manifest entry into a descriptor.
pub fn load(entry: &ManifestEntry, upstream: Arc<Upstream>) -> Result<ToolDescriptor, LoadError> {
    let name = derive_tool_name(entry.path);
    let api_tool = (entry.factory)(upstream)?;
    let validator = translate_parameters(&api_tool.definition.parameters)?;

    Ok(ToolDescriptor {
        name,
        title: api_tool.definition.name,
        description: api_tool.definition.description,
        parameters: api_tool.definition.parameters,
        validator,
        handler: api_tool.handler,
    })
}

/// Load every manifest entry and register the successes.
///
/// Returns the number of tools registered. Runs once at startup, before any
/// transport is serving.
pub fn register_manifest(
    registry: &mut ToolRegistry,
    manifest: &[ManifestEntry],
    upstream: Arc<Upstream>,
) -> usize {
    let mut registered = 0;

    for entry in manifest {
        match load(entry, upstream.clone()) {
            Ok(descriptor) => {
                let name = descriptor.name.clone();
                match registry.register(descriptor) {
                    Ok(()) => {
                        info!("Registered tool: {}", name);
                        registered += 1;
                    }
                    Err(e) => {
                        warn!("Tool {} from {} skipped: {}", name, entry.path, e);
                    }
                }
            }
            Err(e) => {
                warn!("Failed to register tool from {}: {}", entry.path, e);
            }
        }
    }

    registered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UpstreamConfig;
    use futures::FutureExt;
    use serde_json::json;

    fn test_upstream() -> Arc<Upstream> {
        Arc::new(Upstream::new(&UpstreamConfig::default()))
    }

    fn stub_tool(declared_name: &str, parameters: Value) -> ApiTool {
        ApiTool {
            definition: ToolDefinition {
                name: declared_name.to_string(),
                description: "stub".to_string(),
                parameters,
            },
            handler: Arc::new(|_| async { Ok(json!({"ok": true})) }.boxed()),
        }
    }

    fn ok_factory(_: Arc<Upstream>) -> Result<ApiTool, LoadError> {
        Ok(stub_tool("create_order", json!({ "type": "object", "properties": {} })))
    }

    fn bad_schema_factory(_: Arc<Upstream>) -> Result<ApiTool, LoadError> {
        // Array schema missing `items` must fail translation.
        Ok(stub_tool(
            "broken",
            json!({
                "type": "object",
                "properties": { "ids": { "type": "array" } }
            }),
        ))
    }

    fn missing_factory(_: Arc<Upstream>) -> Result<ApiTool, LoadError> {
        Err(LoadError::MissingTool("no apiTool or default export".to_string()))
    }

    #[test]
    fn test_derive_tool_name() {
        assert_eq!(derive_tool_name("supercommerce-api/backend-ap-is/create-order.js"), "create-order");
        assert_eq!(derive_tool_name("supercommerce/orders/view-order"), "view-order");
        assert_eq!(derive_tool_name("login.rs"), "login");
        assert_eq!(derive_tool_name("plain"), "plain");
    }

    #[test]
    fn test_register_manifest_skips_failures_independently() {
        let manifest = [
            ManifestEntry { path: "a/good-tool.js", factory: ok_factory },
            ManifestEntry { path: "a/bad-schema.js", factory: bad_schema_factory },
            ManifestEntry { path: "a/missing.js", factory: missing_factory },
            ManifestEntry { path: "b/other-tool.js", factory: ok_factory },
        ];

        let mut registry = ToolRegistry::new();
        let count = register_manifest(&mut registry, &manifest, test_upstream());

        assert_eq!(count, 2);
        assert!(registry.lookup("good-tool").is_some());
        assert!(registry.lookup("other-tool").is_some());
        assert!(registry.lookup("bad-schema").is_none());
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn test_duplicate_derived_name_first_wins() {
        // Two modules in different directories normalize to the same name.
        let manifest = [
            ManifestEntry { path: "v1/create-order.js", factory: ok_factory },
            ManifestEntry { path: "v2/create-order.js", factory: ok_factory },
        ];

        let mut registry = ToolRegistry::new();
        let count = register_manifest(&mut registry, &manifest, test_upstream());

        assert_eq!(count, 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("create-order").is_some());
    }

    #[test]
    fn test_load_builds_validator_and_derived_name() {
        let entry = ManifestEntry { path: "x/create-order.js", factory: ok_factory };
        let descriptor = load(&entry, test_upstream()).unwrap();
        assert_eq!(descriptor.name, "create-order");
        assert_eq!(descriptor.title, "create_order");
    }

    #[test]
    fn test_load_rejects_non_object_top_level() {
        fn scalar_factory(_: Arc<Upstream>) -> Result<ApiTool, LoadError> {
            Ok(stub_tool("scalar", json!({ "type": "string" })))
        }
        let entry = ManifestEntry { path: "x/scalar.js", factory: scalar_factory };
        assert!(matches!(
            load(&entry, test_upstream()),
            Err(LoadError::Translation(_))
        ));
    }
}
