//! # Warden Supervisor
//!
//! Request moderation and intent extraction for the warden agent.
//!
//! The supervisor is a cheap, fast pre-filter that runs before any
//! expensive reasoning:
//!
//! 1. **Content filter**: rejects unsafe queries (path traversal,
//!    destructive commands, prompt injection) against an ordered pattern
//!    table, before anything else happens
//! 2. **Language normalization**: maps non-English queries into English
//!    via one model call, falling back to the original text on any failure
//! 3. **Intent extraction**: classifies the query into a typed intent with
//!    the tools it will need, via the model when available and via a
//!    deterministic bilingual pattern table otherwise
//!
//! The single entry point is [`RequestSupervisor::moderate_request`], which
//! never returns an error: every failure mode is converted into a
//! well-formed [`ModerationResponse`].
//!
//! ## Example
//!
//! ```
//! use warden_supervisor::{RequestSupervisor, SupervisorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let supervisor = RequestSupervisor::new(SupervisorConfig::default())?;
//! let request = supervisor.create_request("list files", "conv-1");
//! let response = supervisor.moderate_request(&request).await;
//!
//! assert!(response.allowed);
//! assert!(response.intent.is_some());
//! # Ok(())
//! # }
//! ```

pub mod filter;
pub mod intent;
pub mod language;
pub mod supervisor;
pub mod types;

// Re-export public API
pub use filter::{scan, FilterMatch, SafetyRisk};
pub use intent::{classify_fallback, parse_intent_payload};
pub use supervisor::{RequestSupervisor, SupervisorConfig};
pub use types::{
    IntentData, IntentType, ModerationDecision, ModerationRequest, ModerationResponse,
};
