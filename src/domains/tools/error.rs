//! Tool-specific error types.

use thiserror::Error;

use super::schema::SchemaError;

/// Errors that can occur during tool operations.
///
/// Unknown-tool and invalid-argument outcomes are not errors; the dispatcher
/// reports them as error-typed envelopes. This enum covers registration
/// conflicts and handler faults.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool with this name is already registered.
    #[error("Tool already registered: {0}")]
    Duplicate(String),

    /// The tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }
}

/// Errors that can occur while loading a manifest entry.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The entry's factory could not produce a tool.
    #[error("module produced no tool: {0}")]
    MissingTool(String),

    /// The tool's declared parameter schema failed translation.
    #[error("schema translation failed: {0}")]
    Translation(#[from] SchemaError),
}
