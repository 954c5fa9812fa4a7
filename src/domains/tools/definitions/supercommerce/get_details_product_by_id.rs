//! Get details of a product by its ID.

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
            name: "get_product_details".to_string(),
            description: "Get details of a product by its ID.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "The ID of the product to retrieve details for."
                    }
                },
                "required": ["id"]
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                let id = args["id"].as_str().unwrap_or_default().to_string();

                match upstream.get(&format!("/api/admin/products/{id}")).await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error getting product details: {}", e);
                        Ok(json!({ "error": "An error occurred while getting product details." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
