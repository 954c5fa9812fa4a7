//! Crate-level error type.
//!
//! Domain modules keep their own error enums; this type unifies them at the
//! seams where a caller spans domains (the server surface, library users).

use thiserror::Error;

/// Result alias over the unified [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure the bridge can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    #[error("resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    #[error("transport error: {0}")]
    Transport(#[from] crate::core::transport::TransportError),
}
