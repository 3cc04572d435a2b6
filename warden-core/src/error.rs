use thiserror::Error;

/// Errors that can occur while driving the reasoning loop.
///
/// These are internal plumbing: the public entry points
/// (`moderate_request`, `run`) convert every variant into a well-formed
/// response object before returning, so callers never see a raw error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AgentError {
    /// Model provider error during reasoning
    #[error("Model provider error: {0}")]
    Llm(#[from] LlmError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse a model response
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),

    /// No tools are registered, so no action can ever be taken
    #[error("Tool registry is empty")]
    EmptyRegistry,

    /// Wall-clock deadline for the run was exceeded
    #[error("Deadline exceeded after {elapsed_ms}ms (limit: {deadline_ms}ms)")]
    DeadlineExceeded { elapsed_ms: u64, deadline_ms: u64 },

    /// Other agent-specific error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Check if this error is retriable (transient failures).
    ///
    /// Returns `true` for errors that might succeed on retry: deadline
    /// overruns and rate-limited or timed-out model calls.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            AgentError::DeadlineExceeded { .. }
                | AgentError::Llm(LlmError::RateLimit(_))
                | AgentError::Llm(LlmError::Timeout(_))
        )
    }

    /// Check if this is a deadline error.
    pub fn is_deadline(&self) -> bool {
        matches!(self, AgentError::DeadlineExceeded { .. })
    }
}

/// Errors that can occur in a model provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmError {
    /// Invalid request (e.g., empty prompt)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// No content in response
    #[error("No content in response")]
    NoContent,

    /// Response processing error
    #[error("Failed to process response: {0}")]
    ResponseProcessing(String),

    /// Other provider error
    #[error("{0}")]
    Other(String),
}

impl LlmError {
    /// Check if this error is retryable.
    ///
    /// Returns `true` for transient errors that might succeed on retry:
    /// timeouts and rate limits.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Timeout(_) | LlmError::RateLimit(_))
    }
}
