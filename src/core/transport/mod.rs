//! Transport layer for the bridge.
//!
//! Two HTTP ingress shapes expose the same protocol surface: a unary
//! JSON-RPC endpoint and a persistent SSE stream with out-of-band
//! correlated messages.

pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, JsonRpcRequest, JsonRpcResponse};
pub use session::{SessionError, SessionManager, SseFrame};
