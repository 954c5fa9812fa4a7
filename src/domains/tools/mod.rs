//! Tools domain module.
//!
//! Tools are remote-callable, schema-typed functions bridged to the
//! Supercommerce admin API. The pipeline runs once at startup:
//!
//! - `definitions/` - the compiled-in manifest, one file per tool
//! - `loader.rs` - loads manifest entries into normalized descriptors
//! - `schema.rs` - translates declared parameter schemas into validators
//! - `registry.rs` - the name-to-descriptor table, frozen after registration
//! - `dispatcher.rs` - validates arguments and invokes handlers at call time
//! - `upstream.rs` - the shared commerce API client handlers delegate to
//!
//! ## Adding a new tool
//!
//! 1. Create a new file in `definitions/supercommerce/` exporting `api_tool`
//! 2. Export the module in `definitions/supercommerce/mod.rs`
//! 3. Add a `ManifestEntry` in `definitions/mod.rs`
//!
//! The registry, dispatcher, and transports pick it up automatically.

pub mod definitions;
pub mod dispatcher;
mod error;
pub mod loader;
mod registry;
pub mod schema;
pub mod upstream;

pub use dispatcher::{CallEnvelope, ContentBlock, Dispatcher};
pub use error::{LoadError, ToolError};
pub use loader::{ApiTool, ManifestEntry, ToolDescriptor, ToolHandler, register_manifest};
pub use registry::ToolRegistry;
pub use schema::{SchemaError, ValidatorNode};
pub use upstream::{Upstream, UpstreamError};
