//! Retrieve the paginated product list.

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
            name: "get_product_list".to_string(),
            description: "Retrieve the product list from the backend API.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "page": { "type": "string", "description": "The page number for pagination." },
                    "keyword_or_sku": { "type": "string", "description": "The keyword or SKU to search for products." },
                    "category_id": { "type": "string", "description": "The category ID to filter products." },
                    "sub_category_id": { "type": "string", "description": "The sub-category ID to filter products." },
                    "inventory_id": { "type": "string", "description": "The inventory ID to filter products." },
                    "parent_id": { "type": "string", "description": "The parent ID to filter products." }
                },
                "required": ["page", "keyword_or_sku"]
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                let mut query: Vec<(&str, String)> = vec![
                    ("page", args["page"].as_str().unwrap_or_default().to_string()),
                    ("q", args["keyword_or_sku"].as_str().unwrap_or_default().to_string()),
                ];
                for key in ["category_id", "sub_category_id", "inventory_id", "parent_id"] {
                    if let Some(value) = args[key].as_str().filter(|v| !v.is_empty()) {
                        query.push((key, value.to_string()));
                    }
                }

                match upstream.get_with_query("/api/admin/v2/products", &query).await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error fetching product list: {}", e);
                        Ok(json!({ "error": "An error occurred while fetching the product list." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
