//! Create an address for a customer.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Value, json};
use tracing::error;

use crate::domains::tools::error::LoadError;
use crate::domains::tools::loader::{ApiTool, ToolDefinition};
use crate::domains::tools::upstream::Upstream;

const OPTIONAL_TEXT_FIELDS: &[&str] = &[
    "landmark",
    "building",
    "phone",
    "floor",
    "apartment",
    "shop_name",
    "commercial_record",
    "bank_account",
    "contact_number",
    "shop_image",
    "attachment_2",
    "attachment_3",
    "email",
];

pub fn api_tool(upstream: Arc<Upstream>) -> Result<ApiTool, LoadError> {
    let mut properties = serde_json::Map::new();
    properties.insert("id".into(), json!({ "type": "string", "description": "The ID of the customer." }));
    properties.insert("name".into(), json!({ "type": "string", "description": "The name associated with the address." }));
    properties.insert("address".into(), json!({ "type": "string", "description": "The address details." }));
    properties.insert("city_id".into(), json!({ "type": "integer", "description": "The ID of the city." }));
    properties.insert("area_id".into(), json!({ "type": "integer", "description": "The ID of the area." }));
    for field in OPTIONAL_TEXT_FIELDS {
        properties.insert((*field).into(), json!({ "type": "string" }));
    }
    properties.insert("lat".into(), json!({ "type": "number", "description": "The latitude of the address." }));
    properties.insert("lng".into(), json!({ "type": "number", "description": "The longitude of the address." }));

    Ok(ApiTool {
        definition: ToolDefinition {
            name: "create_address".to_string(),
            description: "Create an address for a customer.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": properties,
                "required": ["id", "name", "address", "city_id", "area_id"]
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                let id = args["id"].as_str().unwrap_or_default().to_string();

                let mut body = serde_json::Map::new();
                body.insert("name".into(), args["name"].clone());
                body.insert("address".into(), args["address"].clone());
                body.insert("city_id".into(), args["city_id"].clone());
                body.insert("area_id".into(), args["area_id"].clone());
                for field in OPTIONAL_TEXT_FIELDS {
                    let value = args[*field].as_str().unwrap_or_default();
                    body.insert((*field).into(), json!(value));
                }
                body.insert("lat".into(), args.get("lat").cloned().unwrap_or(json!(0)));
                body.insert("lng".into(), args.get("lng").cloned().unwrap_or(json!(0)));

                match upstream
                    .post(&format!("/api/admin/customers/{id}/address"), &Value::Object(body))
                    .await
                {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error creating address: {}", e);
                        Ok(json!({ "error": "An error occurred while creating the address." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
