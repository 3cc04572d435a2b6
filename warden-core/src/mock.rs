//! Scripted model providers for offline testing.
//!
//! [`ScriptedProvider`] replays a fixed sequence of canned responses,
//! enabling:
//!
//! - **Offline testing**: run the full reasoning loop without API calls
//! - **Deterministic testing**: replay exact sequences for reproducible tests
//!
//! The cursor advances on every call, so a test scripts one response per
//! expected model invocation, in order.
//!
//! # Example
//!
//! ```
//! use warden_core::{LlmRequest, ModelProvider, ScriptedProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ScriptedProvider::from_responses(vec![
//!     r#"{"tool_name": "list_files"}"#.to_string(),
//! ]);
//!
//! let text = provider.invoke(LlmRequest::new("list files")).await?;
//! assert!(text.contains("list_files"));
//! # Ok(())
//! # }
//! ```

use crate::error::LlmError;
use crate::llm::{LlmRequest, ModelProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Model provider that replays a scripted sequence of responses.
///
/// Each call to [`invoke`](ModelProvider::invoke) returns the next scripted
/// response. The request is validated but not used to select the response;
/// responses are returned strictly in order.
#[derive(Debug)]
pub struct ScriptedProvider {
    /// Responses to replay, in order
    responses: Vec<String>,

    /// Current response index
    cursor: AtomicUsize,
}

impl ScriptedProvider {
    /// Create a provider that replays the given responses in order.
    pub fn from_responses(responses: Vec<String>) -> Self {
        Self {
            responses,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Create a provider with a single response.
    pub fn single(response: impl Into<String>) -> Self {
        Self::from_responses(vec![response.into()])
    }

    /// Get the number of responses consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor.load(Ordering::SeqCst).min(self.responses.len())
    }

    /// Check if all scripted responses have been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.load(Ordering::SeqCst) >= self.responses.len()
    }

    /// Reset to the beginning of the script.
    pub fn reset(&self) {
        self.cursor.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    /// Return the next scripted response.
    ///
    /// # Errors
    ///
    /// - [`LlmError::InvalidRequest`] if the request prompt is empty
    /// - [`LlmError::NoContent`] if the script is exhausted
    async fn invoke(&self, request: LlmRequest) -> Result<String, LlmError> {
        request.validate()?;

        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(index)
            .cloned()
            .ok_or(LlmError::NoContent)
    }
}

/// Model provider that fails every call.
///
/// Used to exercise fallback paths: intent extraction degrading to pattern
/// matching, tool selection degrading to the deterministic rule table.
#[derive(Debug, Default)]
pub struct FailingProvider;

impl FailingProvider {
    /// Create a new always-failing provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelProvider for FailingProvider {
    async fn invoke(&self, request: LlmRequest) -> Result<String, LlmError> {
        request.validate()?;
        Err(LlmError::Other("provider unavailable".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_returns_responses_in_order() {
        let provider = ScriptedProvider::from_responses(vec![
            "first".to_string(),
            "second".to_string(),
        ]);

        let r1 = provider.invoke(LlmRequest::new("a")).await.unwrap();
        assert_eq!(r1, "first");
        assert_eq!(provider.consumed(), 1);

        let r2 = provider.invoke(LlmRequest::new("b")).await.unwrap();
        assert_eq!(r2, "second");
        assert!(provider.is_exhausted());
    }

    #[tokio::test]
    async fn test_scripted_exhausted_returns_no_content() {
        let provider = ScriptedProvider::from_responses(vec![]);
        let result = provider.invoke(LlmRequest::new("anything")).await;
        assert!(matches!(result, Err(LlmError::NoContent)));
    }

    #[tokio::test]
    async fn test_scripted_validates_empty_prompt() {
        let provider = ScriptedProvider::single("response");
        let result = provider.invoke(LlmRequest::new("")).await;
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
        // Validation failure must not consume a response
        assert_eq!(provider.consumed(), 0);
    }

    #[tokio::test]
    async fn test_scripted_reset() {
        let provider = ScriptedProvider::single("only");
        let _ = provider.invoke(LlmRequest::new("a")).await.unwrap();
        assert!(provider.is_exhausted());

        provider.reset();
        assert!(!provider.is_exhausted());
        let again = provider.invoke(LlmRequest::new("b")).await.unwrap();
        assert_eq!(again, "only");
    }

    #[tokio::test]
    async fn test_failing_provider_always_errors() {
        let provider = FailingProvider::new();
        let result = provider.invoke(LlmRequest::new("hello")).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }
}
