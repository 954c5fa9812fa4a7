//! Supercommerce MCP bridge server.
//!
//! Exposes a commerce admin API as a set of MCP tools over JSON-RPC 2.0.
//! Tool modules declare their parameters in a JSON-Schema-like form; the
//! registry translates each schema into a validator at startup, and the
//! dispatcher validates every call before it reaches the upstream API.
//!
//! Two transports serve the same protocol surface: a unary HTTP endpoint
//! and a persistent SSE session stream with correlated POST messages.

pub mod core;
pub mod domains;

pub use core::{BridgeServer, Config, Error, Result};
