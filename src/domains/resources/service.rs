//! Resource service implementation.
//!
//! Maintains the static resource table and handles listing and reads.

use std::collections::HashMap;

use serde_json::{Value, json};

use super::error::ResourceError;

/// An entry in the resource table.
#[derive(Debug, Clone)]
struct ResourceEntry {
    name: String,
    mime_type: String,
    text: String,
}

/// Service for listing and reading resources.
pub struct ResourceService {
    /// Key: resource URI.
    resources: HashMap<String, ResourceEntry>,
}

impl ResourceService {
    /// Create the service with the built-in document resources.
    pub fn new() -> Self {
        let mut resources = HashMap::new();
        resources.insert(
            "document://getting-started".to_string(),
            ResourceEntry {
                name: "document-getting-started".to_string(),
                mime_type: "text/plain".to_string(),
                text: "Getting Started".to_string(),
            },
        );
        Self { resources }
    }

    /// Resource metadata for `resources/list`.
    pub fn list_resources(&self) -> Vec<Value> {
        let mut listed: Vec<Value> = self
            .resources
            .iter()
            .map(|(uri, entry)| {
                json!({
                    "uri": uri,
                    "name": entry.name,
                    "mimeType": entry.mime_type,
                })
            })
            .collect();
        listed.sort_by_key(|r| r["uri"].as_str().map(str::to_string));
        listed
    }

    /// Template metadata for `resources/templates/list`.
    pub fn list_resource_templates(&self) -> Vec<Value> {
        vec![json!({
            "uriTemplate": "document://{name}",
            "name": "document",
        })]
    }

    /// Read a resource by URI.
    pub fn read_resource(&self, uri: &str) -> Result<Value, ResourceError> {
        let entry = self
            .resources
            .get(uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        Ok(json!({
            "contents": [{
                "uri": uri,
                "text": entry.text,
                "mimeType": entry.mime_type,
            }]
        }))
    }
}

impl Default for ResourceService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_contains_getting_started() {
        let service = ResourceService::new();
        let resources = service.list_resources();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0]["uri"], "document://getting-started");
    }

    #[test]
    fn test_read_existing_resource() {
        let service = ResourceService::new();
        let result = service.read_resource("document://getting-started").unwrap();
        assert_eq!(result["contents"][0]["text"], "Getting Started");
        assert_eq!(result["contents"][0]["mimeType"], "text/plain");
    }

    #[test]
    fn test_read_unknown_resource() {
        let service = ResourceService::new();
        let err = service.read_resource("document://nope").unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(_)));
    }
}
