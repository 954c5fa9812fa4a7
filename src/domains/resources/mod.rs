//! Resources domain module.
//!
//! The bridge exposes a single static documentation resource under the
//! `document://` template, matching what clients can list and read over MCP.

mod error;
mod service;

pub use error::ResourceError;
pub use service::ResourceService;
