//! List orders from the backend API, with search and pagination filters.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Value, json};
use tracing::error;

use crate::domains::tools::error::LoadError;
use crate::domains::tools::loader::{ApiTool, ToolDefinition};
use crate::domains::tools::upstream::Upstream;

fn str_or_empty(args: &Value, key: &str) -> String {
    args[key].as_str().unwrap_or_default().to_string()
}

pub fn api_tool(upstream: Arc<Upstream>) -> Result<ApiTool, LoadError> {
    Ok(ApiTool {
        definition: ToolDefinition {
            name: "list_orders".to_string(),
            description: "List orders from the backend API.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "term": { "type": "string", "description": "Search term for filtering orders." },
                    "state_id": { "type": "string", "description": "State ID for filtering orders." },
                    "date_from": { "type": "string", "description": "Start date for filtering orders." },
                    "date_to": { "type": "string", "description": "End date for filtering orders." },
                    "start_date_time": { "type": "string", "description": "Start date and time for filtering orders." },
                    "end_date_time": { "type": "string", "description": "End date and time for filtering orders." },
                    "branch_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of branch IDs for filtering orders."
                    },
                    "customer_name": { "type": "string", "description": "Customer name for filtering orders." },
                    "customer_email": { "type": "string", "description": "Customer email for filtering orders." },
                    "customer_phone": { "type": "string", "description": "Customer phone for filtering orders." },
                    "per_page": { "type": "integer", "description": "Number of orders to return per page." },
                    "page": { "type": "integer", "description": "Page number for pagination." }
                },
                "required": []
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                let per_page = args["per_page"].as_i64().unwrap_or(20);
                let page = args["page"].as_i64().unwrap_or(1);

                let body = json!({
                    "term": str_or_empty(&args, "term"),
                    "state_id": str_or_empty(&args, "state_id"),
                    "date_from": str_or_empty(&args, "date_from"),
                    "date_to": str_or_empty(&args, "date_to"),
                    "start_date_time": str_or_empty(&args, "start_date_time"),
                    "end_date_time": str_or_empty(&args, "end_date_time"),
                    "branch_ids": args["branch_ids"].as_array().cloned().unwrap_or_default(),
                    "customer_name": str_or_empty(&args, "customer_name"),
                    "customer_email": str_or_empty(&args, "customer_email"),
                    "customer_phone": str_or_empty(&args, "customer_phone"),
                    "hide_scheduled": 1,
                    "per_page": per_page.to_string(),
                    "page": page,
                });

                match upstream.post("/api/admin/v2/orders", &body).await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error listing orders: {}", e);
                        Ok(json!({ "error": "An error occurred while listing orders." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
