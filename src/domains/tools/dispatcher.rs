//! Request dispatching - validate arguments, invoke the handler, wrap the
//! result in the protocol content envelope.
//!
//! Every outcome is a well-formed [`CallEnvelope`]; an unknown tool, a
//! validation failure, or a handler fault is an error-typed envelope, never
//! an error that escapes to the transport layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::registry::ToolRegistry;
use super::schema::Violation;

/// One block of envelope content. Tool results are serialized into a single
/// text block tagged with a JSON media type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,

    pub text: String,

    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ContentBlock {
    /// A JSON-typed text block.
    pub fn json(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
            mime_type: Some("application/json".to_string()),
        }
    }

    /// A plain text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
            mime_type: None,
        }
    }
}

/// The uniform wrapper all call results are returned in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEnvelope {
    pub content: Vec<ContentBlock>,

    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallEnvelope {
    /// Successful result envelope.
    pub fn success(content: Vec<ContentBlock>) -> Self {
        Self { content, is_error: None }
    }

    /// Error-typed envelope.
    pub fn error(content: Vec<ContentBlock>) -> Self {
        Self { content, is_error: Some(true) }
    }

    /// Whether this envelope carries an error result.
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}

/// Dispatches calls against a frozen registry. Cheap to clone; never mutates
/// the registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over a registry whose registration phase has
    /// completed.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher reads.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Dispatch one call: resolve, validate, invoke, wrap.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn dispatch(&self, name: &str, arguments: Value) -> CallEnvelope {
        let Some(descriptor) = self.registry.lookup(name) else {
            warn!("Unknown tool requested: {}", name);
            return CallEnvelope::error(vec![ContentBlock::text(format!("Unknown tool: {name}"))]);
        };

        if let Err(violations) = descriptor.validator.validate(&arguments) {
            info!("Argument validation failed for {}: {} violation(s)", name, violations.len());
            return CallEnvelope::error(vec![ContentBlock::text(format_violations(&violations))]);
        }

        match (descriptor.handler)(arguments).await {
            Ok(result) => {
                // Uniform data-level failure shape from the upstream tools.
                let data_error = result.as_object().is_some_and(|o| o.contains_key("error"));

                let text = match serde_json::to_string_pretty(&result) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to serialize result of {}: {}", name, e);
                        return CallEnvelope::error(vec![ContentBlock::text(format!(
                            "Failed to serialize tool result: {e}"
                        ))]);
                    }
                };

                if data_error {
                    info!("Tool {} returned an error result", name);
                    CallEnvelope::error(vec![ContentBlock::json(text)])
                } else {
                    CallEnvelope::success(vec![ContentBlock::json(text)])
                }
            }
            Err(e) => {
                error!("Tool {} failed: {}", name, e);
                CallEnvelope::error(vec![ContentBlock::text(format!("Tool execution failed: {e}"))])
            }
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    let details: Vec<String> = violations.iter().map(ToString::to_string).collect();
    format!("Invalid arguments: {}", details.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UpstreamConfig;
    use crate::domains::tools::error::LoadError;
    use crate::domains::tools::loader::{ApiTool, ManifestEntry, ToolDefinition, ToolDescriptor, load};
    use crate::domains::tools::schema::translate_parameters;
    use crate::domains::tools::upstream::Upstream;
    use futures::FutureExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Each test owns its counter; tests run on parallel threads, so a shared
    // counter would let one test's dispatches move another's readings.
    fn counted_view_order(calls: Arc<AtomicUsize>) -> ToolDescriptor {
        let parameters = json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"]
        });
        ToolDescriptor {
            name: "view-order".to_string(),
            title: "view_order".to_string(),
            description: "View an order.".to_string(),
            validator: translate_parameters(&parameters).unwrap(),
            parameters,
            handler: Arc::new(move |args| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({ "order": { "id": args["id"] } }))
                }
                .boxed()
            }),
        }
    }

    fn dispatcher_with(descriptor: ToolDescriptor) -> Dispatcher {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor).unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    fn failing_factory(_: Arc<Upstream>) -> Result<ApiTool, LoadError> {
        Ok(ApiTool {
            definition: ToolDefinition {
                name: "failing".to_string(),
                description: "Always fails.".to_string(),
                parameters: json!({ "type": "object", "properties": {} }),
            },
            handler: Arc::new(|_| {
                async {
                    Err(crate::domains::tools::error::ToolError::execution_failed("boom"))
                }
                .boxed()
            }),
        })
    }

    fn data_error_factory(_: Arc<Upstream>) -> Result<ApiTool, LoadError> {
        Ok(ApiTool {
            definition: ToolDefinition {
                name: "data_error".to_string(),
                description: "Returns the uniform {error} shape.".to_string(),
                parameters: json!({ "type": "object", "properties": {} }),
            },
            handler: Arc::new(|_| {
                async { Ok(json!({ "error": "An error occurred while viewing the order." })) }.boxed()
            }),
        })
    }

    fn dispatcher() -> Dispatcher {
        let upstream = Arc::new(Upstream::new(&UpstreamConfig::default()));
        let mut registry = ToolRegistry::new();
        for entry in [
            ManifestEntry { path: "t/failing.js", factory: failing_factory },
            ManifestEntry { path: "t/data-error.js", factory: data_error_factory },
        ] {
            registry.register(load(&entry, upstream.clone()).unwrap()).unwrap();
        }
        Dispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_envelope() {
        let envelope = dispatcher().dispatch("nope", json!({})).await;
        assert!(envelope.is_error());
        assert!(envelope.content[0].text.contains("Unknown tool: nope"));
    }

    #[tokio::test]
    async fn test_validation_failure_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher_with(counted_view_order(calls.clone()));

        let envelope = dispatcher.dispatch("view-order", json!({})).await;
        assert!(envelope.is_error());
        assert!(envelope.content[0].text.contains("id"));
        assert!(envelope.content[0].text.contains("missing required"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_call_invokes_handler_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher_with(counted_view_order(calls.clone()));

        let envelope = dispatcher.dispatch("view-order", json!({ "id": "42" })).await;

        assert!(!envelope.is_error());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(envelope.content.len(), 1);
        assert_eq!(envelope.content[0].kind, "text");
        assert_eq!(envelope.content[0].mime_type.as_deref(), Some("application/json"));

        let parsed: Value = serde_json::from_str(&envelope.content[0].text).unwrap();
        assert_eq!(parsed["order"]["id"], "42");
    }

    #[tokio::test]
    async fn test_handler_error_is_caught() {
        let envelope = dispatcher().dispatch("failing", json!({})).await;
        assert!(envelope.is_error());
        assert!(envelope.content[0].text.contains("boom"));
    }

    #[tokio::test]
    async fn test_data_level_error_shape_is_error_envelope() {
        let envelope = dispatcher().dispatch("data-error", json!({})).await;
        assert!(envelope.is_error());
        assert!(envelope.content[0].text.contains("An error occurred"));
        assert_eq!(envelope.content[0].mime_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = CallEnvelope::error(vec![ContentBlock::json("{}")]);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["mimeType"], "application/json");

        let ok = CallEnvelope::success(vec![ContentBlock::json("{}")]);
        let value = serde_json::to_value(&ok).unwrap();
        assert!(value.get("isError").is_none());
    }
}
