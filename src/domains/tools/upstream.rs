//! HTTP client for the Supercommerce admin API.
//!
//! Every tool handler delegates its network call here. The client carries the
//! base URL and bearer token from configuration; tool modules never read the
//! environment themselves.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::core::config::UpstreamConfig;

/// Errors from upstream API calls.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

/// Shared client for the upstream commerce API.
pub struct Upstream {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Upstream {
    /// Create a client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Accept", "application/json");
        if let Some(token) = &self.api_key {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, UpstreamError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api { status, body });
        }
        Ok(response.json().await?)
    }

    /// GET a resource.
    pub async fn get(&self, path: &str) -> Result<Value, UpstreamError> {
        self.send(self.request(Method::GET, path)).await
    }

    /// GET a resource with query parameters.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, UpstreamError> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    /// POST a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, UpstreamError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// PUT a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, UpstreamError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// POST without the bearer token; the login call has no credential yet.
    pub async fn post_unauthenticated(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<Value, UpstreamError> {
        let builder = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
            .json(body);
        self.send(builder).await
    }
}
