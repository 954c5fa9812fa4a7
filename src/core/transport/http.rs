//! HTTP transport: the bridge's two ingress shapes under one router.
//!
//! - `POST <rpc-path>`: transient unary JSON-RPC request/response, no session.
//! - `GET <sse-path>` + `POST <messages-path>?sessionId=<id>`: a persistent
//!   server-push stream; correlated messages are POSTed out-of-band, answered
//!   `202 Accepted`, and their JSON-RPC responses pushed over the stream.
//!
//! Both shapes route through the same dispatcher on the shared server value.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use super::config::HttpConfig;
use super::session::{SessionManager, SseFrame};
use super::{TransportError, TransportResult};
use crate::core::server::BridgeServer;

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Parse error.
    pub fn parse_error(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32700, "Parse error")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The bridge server instance.
    pub server: BridgeServer,

    /// Active persistent sessions.
    pub sessions: Arc<SessionManager>,

    /// Transport configuration (paths are needed for the endpoint frame).
    pub config: Arc<HttpConfig>,
}

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Run the HTTP transport until shutdown.
    pub async fn run(self, server: BridgeServer) -> TransportResult<()> {
        let addr = self.config.address();
        let keepalive = Duration::from_secs(self.config.keepalive_secs);

        let state = AppState {
            server,
            sessions: Arc::new(SessionManager::new(keepalive)),
            config: Arc::new(self.config.clone()),
        };

        let app = router(state);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - {}", self.config.description());

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the router over the given state.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .route(&config.rpc_path, post(handle_rpc))
        .route(&config.sse_path, get(handle_sse))
        .route(&config.messages_path, post(handle_messages))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "protocol": "JSON-RPC 2.0",
        "endpoints": {
            "rpc": state.config.rpc_path,
            "stream": state.config.sse_path,
            "messages": state.config.messages_path,
            "health": "/health"
        }
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Drops with the SSE response body; schedules session teardown.
struct SessionGuard {
    id: String,
    sessions: Arc<SessionManager>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let sessions = self.sessions.clone();
        let id = std::mem::take(&mut self.id);
        tokio::spawn(async move {
            sessions.close(&id).await;
        });
    }
}

fn frame_to_event(frame: SseFrame) -> Event {
    match frame {
        SseFrame::Endpoint(url) => Event::default().event("endpoint").data(url),
        SseFrame::Message(json) => Event::default().event("message").data(json),
        SseFrame::Comment(text) => Event::default().comment(text),
    }
}

/// Open a persistent session and stream frames until the client disconnects.
#[instrument(skip_all)]
async fn handle_sse(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let (session_id, rx) = state.sessions.open().await;
    info!("Stream connected, sessionId {}", session_id);

    // First frame: tell the client where to POST correlated messages.
    let endpoint = format!("{}?sessionId={}", state.config.messages_path, session_id);
    if let Err(e) = state.sessions.send(&session_id, SseFrame::Endpoint(endpoint)).await {
        error!("Failed to send endpoint frame: {}", e);
    }

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let stream = ReceiverStream::new(rx).map(move |frame| {
        // The guard lives inside the stream; dropping the response body
        // closes the session.
        let _ = &guard;
        Ok(frame_to_event(frame))
    });

    Sse::new(stream)
}

/// Query parameters for the messages endpoint.
#[derive(Debug, Deserialize)]
struct MessagesQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Deliver one correlated call to an Active session's transport.
#[instrument(skip_all, fields(session_id))]
async fn handle_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
    payload: Result<Json<JsonRpcRequest>, JsonRejection>,
) -> Response {
    // `?sessionId=` with an empty value counts as absent.
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        error!("Message received without sessionId");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "sessionId is required" })),
        )
            .into_response();
    };
    tracing::Span::current().record("session_id", &session_id);

    if !state.sessions.contains(&session_id).await {
        error!("No transport found for sessionId: {}", session_id);
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Transport not found for sessionId" })),
        )
            .into_response();
    }

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Malformed message body: {}", rejection);
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::parse_error(None)),
            )
                .into_response();
        }
    };

    let is_notification = request.id.is_none();
    let response = process_request(&state, request).await;

    if !is_notification {
        match serde_json::to_string(&response) {
            Ok(json) => {
                // The session may have closed while the call was in flight;
                // an undeliverable result is discarded, never retried.
                if let Err(e) = state.sessions.send(&session_id, SseFrame::Message(json)).await {
                    warn!("Discarding response for session {}: {}", session_id, e);
                }
            }
            Err(e) => error!("Failed to serialize response: {}", e),
        }
    }

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

/// Handle unary JSON-RPC requests (transient, non-session transport).
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    payload: Result<Json<JsonRpcRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Malformed request body: {}", rejection);
            return (StatusCode::OK, Json(JsonRpcResponse::parse_error(None)));
        }
    };

    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;
    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => {
            JsonRpcResponse::success(request.id, state.server.initialize_result())
        }

        "tools/list" => {
            let tools = state.server.list_tools();
            JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools }))
        }

        "tools/call" => handle_tools_call(state, request).await,

        "resources/list" => {
            let resources = state.server.list_resources();
            JsonRpcResponse::success(request.id, serde_json::json!({ "resources": resources }))
        }

        "resources/templates/list" => {
            let templates = state.server.list_resource_templates();
            JsonRpcResponse::success(
                request.id,
                serde_json::json!({ "resourceTemplates": templates }),
            )
        }

        "resources/read" => handle_resources_read(state, request),

        // Notifications need no payload in response.
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle tools/call request.
async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };

    let Some(name) = params.get("name").and_then(|v| v.as_str()).map(str::to_string) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    // Tool-level failures are successful protocol responses whose envelope
    // is marked as an error result.
    let envelope = state.server.call_tool(&name, arguments).await;
    match serde_json::to_value(&envelope) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

/// Handle resources/read request.
fn handle_resources_read(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };

    let Some(uri) = params.get("uri").and_then(|v| v.as_str()) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing resource URI");
    };

    match state.server.read_resource(uri) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e.to_string()),
    }
}
