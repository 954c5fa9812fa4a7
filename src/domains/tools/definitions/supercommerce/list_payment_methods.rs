//! List the configured payment methods.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::json;
use tracing::error;

use crate::domains::tools::error::LoadError;
use crate::domains::tools::loader::{ApiTool, ToolDefinition};
use crate::domains::tools::upstream::Upstream;

pub fn api_tool(upstream: Arc<Upstream>) -> Result<ApiTool, LoadError> {
    Ok(ApiTool {
        definition: ToolDefinition {
            name: "list_payment_methods".to_string(),
            description: "List payment methods from the backend API.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        handler: Arc::new(move |_args| {
            let upstream = upstream.clone();
            async move {
                match upstream.get("/api/admin/payment_methods/").await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error listing payment methods: {}", e);
                        Ok(json!({ "error": "An error occurred while listing payment methods." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
