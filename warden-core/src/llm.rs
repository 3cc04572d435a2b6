//! Model provider abstraction.
//!
//! The reasoning components never talk to a concrete LLM backend. They
//! depend on [`ModelProvider`], a single-method seam that takes a prompt
//! and returns text. Any backend (or a scripted replay, see
//! [`crate::mock`]) can sit behind it, as long as it is safe to invoke
//! concurrently.
//!
//! Responses are *expected* to be structured payloads (JSON with fields
//! like a chosen tool name or a continue flag) but that is never
//! guaranteed; callers must parse defensively and fall back to
//! deterministic behavior on garbage.

use crate::error::LlmError;
use async_trait::async_trait;
use std::fmt;

/// Request to a model provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// User prompt
    pub prompt: String,

    /// Optional system instruction
    pub system_instruction: Option<String>,
}

impl LlmRequest {
    /// Create a request with just a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
        }
    }

    /// Create a request with a prompt and a system instruction.
    pub fn with_system(prompt: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: Some(system.into()),
        }
    }

    /// Validate the request.
    ///
    /// An empty prompt is always invalid; providers are expected to call
    /// this before doing any work.
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.prompt.trim().is_empty() {
            return Err(LlmError::InvalidRequest("Prompt cannot be empty".into()));
        }
        Ok(())
    }
}

/// An opaque LLM invocation endpoint.
///
/// Implementations must be safe for concurrent invocation: multiple
/// independent agent runs may share one provider behind an `Arc`.
///
/// # Example
///
/// ```
/// use warden_core::{LlmError, LlmRequest, ModelProvider};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct EchoProvider;
///
/// #[async_trait]
/// impl ModelProvider for EchoProvider {
///     async fn invoke(&self, request: LlmRequest) -> Result<String, LlmError> {
///         request.validate()?;
///         Ok(request.prompt)
///     }
/// }
/// ```
#[async_trait]
pub trait ModelProvider: Send + Sync + fmt::Debug {
    /// Invoke the model with the given request, returning its raw text.
    async fn invoke(&self, request: LlmRequest) -> Result<String, LlmError>;
}
