//! Edit an existing promo code.
//!
//! Several promo fields are declared nullable upstream: the union schemas
//! here (`["string", "null"]` and friends) exercise the translator's
//! nullable handling end to end.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Value, json};
use tracing::error;

use crate::domains::tools::error::LoadError;
use crate::domains::tools::loader::{ApiTool, ToolDefinition};
use crate::domains::tools::upstream::Upstream;

const BODY_FIELDS: &[&str] = &[
    "name",
    "description",
    "type",
    "amount",
    "max_amount",
    "expiration_date",
    "start_date",
    "random_count",
    "minimum_amount",
    "uses_per_user",
    "usage_limit",
    "customer_phones",
    "target_type",
    "work_with_promotion",
    "first_order",
    "free_delivery",
    "show_in_product",
    "check_all_conditions",
    "conditions",
    "vendor_id",
    "mobile_only",
    "payment_methods",
    "customer_ids",
];

pub fn api_tool(upstream: Arc<Upstream>) -> Result<ApiTool, LoadError> {
    Ok(ApiTool {
        definition: ToolDefinition {
            name: "edit_promo_code".to_string(),
            description: "Edit an existing promo code.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "The ID of the promo code to edit." },
                    "name": { "type": "string", "description": "The name of the promo code." },
                    "description": { "type": "string", "description": "A description of the promo code." },
                    "type": { "type": "integer", "description": "Promo code type (1-Amount, 2-Percent, 3-Free Delivery, 4-Exclusive)." },
                    "amount": { "type": "number", "description": "The amount for the promo code." },
                    "max_amount": { "type": ["string", "null"], "description": "Maximum amount for the promo code." },
                    "expiration_date": { "type": "string", "description": "Expiration date of the promo code." },
                    "start_date": { "type": "string", "description": "Start date of the promo code." },
                    "random_count": { "type": ["string", "null"], "description": "Random count." },
                    "minimum_amount": { "type": ["string", "null"], "description": "Minimum amount." },
                    "uses_per_user": { "type": ["integer", "null"], "description": "Uses per user." },
                    "usage_limit": { "type": ["string", "null"], "description": "Usage limit." },
                    "customer_phones": { "type": ["string", "null"], "description": "Customer phones." },
                    "target_type": { "type": ["string", "null"], "description": "Target type." },
                    "work_with_promotion": { "type": "integer", "description": "Work with promotion flag." },
                    "first_order": { "type": "integer", "description": "First order flag." },
                    "free_delivery": { "type": "integer", "description": "Free delivery flag." },
                    "show_in_product": { "type": "integer", "description": "Show in product flag." },
                    "check_all_conditions": { "type": "integer", "description": "Check all conditions flag." },
                    "conditions": { "type": "array", "items": { "type": "object" }, "description": "Conditions array." },
                    "vendor_id": { "type": ["string", "null"], "description": "Vendor ID." },
                    "mobile_only": { "type": "integer", "description": "Mobile only flag." },
                    "payment_methods": { "type": ["string", "null"], "description": "Payment methods." },
                    "customer_ids": { "type": ["array", "null"], "items": { "type": "string" }, "description": "Customer IDs." }
                },
                "required": ["id", "name", "type", "amount", "expiration_date", "start_date"]
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                let id = args["id"].as_str().unwrap_or_default().to_string();

                let mut body = serde_json::Map::new();
                for field in BODY_FIELDS {
                    if let Some(value) = args.get(*field) {
                        body.insert((*field).into(), value.clone());
                    }
                }

                match upstream.put(&format!("/api/admin/promos/{id}"), &Value::Object(body)).await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error editing promo code: {}", e);
                        Ok(json!({ "error": "An error occurred while editing the promo code." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
