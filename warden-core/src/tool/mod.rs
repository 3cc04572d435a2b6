//! Tool abstraction for agent actions.
//!
//! This module provides the core [`Tool`] trait and [`ToolRegistry`] for
//! managing the operations an agent can invoke. The reasoning loop depends
//! only on this interface, never on concrete tool implementations.
//!
//! # Design
//!
//! - **Async execution**: tools use async for I/O-bound operations
//! - **Instance-based registry**: tools are stateless, stored as instances
//! - **Self-describing**: every tool exposes [`ToolMetadata`] through a
//!   uniform introspection call, so the loop can build a model-facing
//!   catalog without hardcoded tool knowledge
//!
//! # Example
//!
//! ```
//! use warden_core::tool::{Tool, ToolResult, ToolError, ToolRegistry};
//! use async_trait::async_trait;
//! use serde_json::{json, Value};
//!
//! #[derive(Debug)]
//! struct MyTool;
//!
//! #[async_trait]
//! impl Tool for MyTool {
//!     fn name(&self) -> &str { "my_tool" }
//!     fn description(&self) -> &str { "Does something useful" }
//!     fn parameters_schema(&self) -> Value {
//!         json!({
//!             "type": "object",
//!             "properties": {
//!                 "input": { "type": "string" }
//!             },
//!             "required": ["input"]
//!         })
//!     }
//!     async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
//!         let input_str = input["input"].as_str().unwrap_or("");
//!         Ok(ToolResult::new(format!("Processed: {}", input_str)))
//!     }
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(MyTool);
//! assert!(registry.contains("my_tool"));
//! ```

mod registry;

pub use registry::ToolRegistry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result returned by a tool execution.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ToolResult {
    /// The main content/output from the tool.
    pub content: String,
    /// Optional structured metadata for observability/logging.
    pub metadata: Value,
}

impl ToolResult {
    /// Create a result with just content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Value::Null,
        }
    }

    /// Create a result with content and metadata.
    pub fn with_metadata(content: impl Into<String>, metadata: Value) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// Errors that can occur during tool execution.
///
/// Rate limits and size limits are enforced by the sandboxed filesystem
/// underneath the tools; they surface here as ordinary variants so the
/// loop can observe them without special-casing the transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ToolError {
    /// Invalid input provided to the tool.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Tool or target not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Tool execution timed out.
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// Underlying resource rate limit was hit.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ToolError {
    /// Check if this is a rate-limit error.
    ///
    /// Rate-limited calls must not be retried in a tight loop; any retry
    /// has to be deferred to a later reasoning step.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ToolError::RateLimited(_))
    }
}

/// Metadata describing a tool's purpose and interface.
///
/// This is what the model sees when choosing among tools: the catalog the
/// loop builds is a list of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description, shown to the model.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub parameters: Value,
    /// Example invocations in natural language.
    pub examples: Vec<String>,
}

/// A tool that agents can invoke to perform actions.
///
/// Tools are the primary mechanism for agents to interact with the external
/// world. Each tool has a unique name, description, and parameter schema
/// that the model uses to decide when and how to invoke it.
///
/// # Async Execution
///
/// The [`execute`](Tool::execute) method is async to support I/O-bound
/// tools like file operations. For synchronous tools, simply don't use
/// `.await` in the implementation.
#[async_trait]
pub trait Tool: Send + Sync + fmt::Debug {
    /// Unique identifier for this tool (e.g., "read_file", "list_files").
    fn name(&self) -> &str;

    /// Human-readable description of what this tool does.
    /// This is shown to the model to help it decide when to use the tool.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input parameters.
    fn parameters_schema(&self) -> Value;

    /// Example invocations in natural language.
    ///
    /// Defaults to none. Tools with non-obvious usage should provide a few.
    fn examples(&self) -> Vec<String> {
        Vec::new()
    }

    /// Execute the tool with the given input.
    ///
    /// The input is a JSON value matching the schema from
    /// [`parameters_schema`](Tool::parameters_schema). Returns a
    /// [`ToolResult`] on success or a [`ToolError`] on failure.
    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError>;

    /// Assemble this tool's metadata for the model-facing catalog.
    ///
    /// The default implementation builds from [`name`](Tool::name),
    /// [`description`](Tool::description),
    /// [`parameters_schema`](Tool::parameters_schema), and
    /// [`examples`](Tool::examples).
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
            examples: self.examples(),
        }
    }
}
