//! Bulk-change the state of one or more orders.

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
            name: "edit_order_status".to_string(),
            description: "Edit the status of an order.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "status_notes": { "type": "string", "description": "Notes regarding the status." },
                    "cancellation_text": { "type": "string", "description": "Text for cancellation." },
                    "cancellation_id": { "type": "string", "description": "ID for cancellation." },
                    "order_ids": {
                        "type": "array",
                        "items": { "type": "integer" },
                        "description": "List of order IDs to update."
                    },
                    "state_id": { "type": "integer", "description": "The new state ID for the orders." },
                    "notify_customer": { "type": "boolean", "description": "Whether to notify the customer." }
                },
                "required": ["order_ids", "state_id"]
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                let body = json!({
                    "status_notes": args["status_notes"],
                    "cancellation_text": args["cancellation_text"],
                    "cancellation_id": args["cancellation_id"],
                    "order_ids": args["order_ids"],
                    "state_id": args["state_id"],
                    "notify_customer": args["notify_customer"],
                });

                match upstream.post("/api/admin/orders/bulk_change_state", &body).await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error editing order status: {}", e);
                        Ok(json!({ "error": "An error occurred while editing the order status." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
