//! Create a main product. Variants are created separately against it.

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
            name: "create_main_product".to_string(),
            description: "1- When create a product must create main product first then create a variant (the sku for the main product is main_{{sku}}\n2- if the product has multible variants (ex differant colors) must add product_variant_options in the main like color and select color ex red to when create the variant to make user select beteen variants".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "brand_id": { "type": "string", "description": "The ID of the brand." },
                    "category_id": { "type": "string", "description": "The ID of the category." },
                    "name": { "type": "string", "description": "The name of the product." },
                    "name_ar": { "type": "string", "description": "The Arabic name of the product." },
                    "preorder": { "type": "integer", "description": "Indicates if the product is a preorder." },
                    "available_soon": { "type": "boolean", "description": "Indicates if the product will be available soon." },
                    "bundle_checkout": { "type": "boolean", "description": "Indicates if the product is a bundle." },
                    "product_variant_options": {
                        "type": "array",
                        "items": { "type": "integer" },
                        "description": "An array of variant option IDs."
                    },
                    "sku": { "type": "string", "description": "The SKU of the product." },
                    "type": { "type": "string", "description": "The type of the product. \"1\" for regular, \"2\" for bundle." }
                },
                "required": ["brand_id", "category_id", "name", "sku", "type", "bundle_checkout", "available_soon"]
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                // The validated arguments are the product payload as-is.
                match upstream.post("/api/admin/products", &args).await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error creating product: {}", e);
                        Ok(json!({ "error": "An error occurred while creating the product." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
