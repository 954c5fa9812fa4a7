//! View an order from the backend API.

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
            name: "view_order".to_string(),
            description: "View an order from the backend API.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "The ID of the order to view."
                    }
                },
                "required": ["id"]
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                let id = args["id"].as_str().unwrap_or_default().to_string();

                match upstream.get(&format!("/api/admin/orders/{id}")).await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error viewing order: {}", e);
                        Ok(json!({ "error": "An error occurred while viewing the order." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
