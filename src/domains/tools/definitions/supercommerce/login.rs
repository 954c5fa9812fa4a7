//! Log in to the backend API.

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
            name: "login".to_string(),
            description: "Log in to the backend API.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "description": "The email address of the user."
                    },
                    "password": {
                        "type": "string",
                        "description": "The password of the user."
                    }
                },
                "required": ["email", "password"]
            }),
        },
        handler: Arc::new(move |args| {
            let upstream = upstream.clone();
            async move {
                let body = json!({
                    "email": args["email"],
                    "password": args["password"],
                });

                // The login call is what obtains a credential, so it carries
                // no bearer token.
                match upstream.post_unauthenticated("/api/admin/auth", &body).await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        error!("Error logging in: {}", e);
                        Ok(json!({ "error": "An error occurred while logging in." }))
                    }
                }
            }
            .boxed()
        }),
    })
}
