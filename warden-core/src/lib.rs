//! # Warden Core
//!
//! Core abstractions for the warden file-system agent.
//!
//! This crate provides the seams the reasoning components depend on:
//!
//! - **Tools**: the [`Tool`] trait and [`ToolRegistry`] give the agent a
//!   uniform, introspectable catalog of named operations
//! - **Model provider**: the [`ModelProvider`] trait abstracts any LLM
//!   backend behind a single `invoke(request) -> text` call
//! - **Errors**: typed error enums shared across the workspace
//!
//! Concrete model clients and the sandboxed filesystem live outside this
//! workspace; the agent consumes them through these interfaces only.
//!
//! ## Example
//!
//! ```no_run
//! use warden_core::{ToolRegistry, ScriptedProvider, ModelProvider, LlmRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ToolRegistry::new();
//! println!("{} tools registered", registry.len());
//!
//! let provider = ScriptedProvider::from_responses(vec!["hello".into()]);
//! let text = provider.invoke(LlmRequest::new("hi")).await?;
//! assert_eq!(text, "hello");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod llm;
pub mod mock;
pub mod tool;
pub mod utils;

// Re-export public API
pub use error::{AgentError, LlmError};
pub use llm::{LlmRequest, ModelProvider};
pub use mock::{FailingProvider, ScriptedProvider};
pub use tool::{Tool, ToolError, ToolMetadata, ToolRegistry, ToolResult};
pub use utils::{extract_json_object, truncate, truncate_with_count};
