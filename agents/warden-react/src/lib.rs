//! # Warden ReAct
//!
//! The ReAct (Reasoning + Acting) loop for the warden agent.
//!
//! The loop iteratively:
//! 1. **Think**: plan the next step, via one consolidated model call or a
//!    deterministic heuristic
//! 2. **Act**: resolve and invoke a tool from the registry
//! 3. **Observe**: record the result (or failure) as text
//! 4. Repeat until the plan signals completion or a bound is reached
//!
//! Every run is bounded by `max_iterations` (and optionally a wall-clock
//! deadline) and always produces an [`AgentResponse`]; tool failures are
//! observations, not crashes. The full Think/Act/Observe trace is returned
//! in `reasoning_steps`.
//!
//! ## Example
//!
//! ```no_run
//! use warden_react::{AgentContext, ReactConfig, ReactLoop};
//! use warden_core::ToolRegistry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ToolRegistry::new();
//! let agent = ReactLoop::new(ReactConfig::default())?;
//! let context = AgentContext::new("conv-1");
//!
//! let result = agent.run("list files", &registry, &context).await;
//! println!("{} (success: {})", result.response, result.success);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod fallback;
pub mod selector;
pub mod types;

// Re-export public API
pub use agent::{AgentContext, ReactLoop};
pub use config::{ReactConfig, ReactPrompts, SelectionStrategy};
pub use fallback::{decide, ToolChoice};
pub use selector::ConsolidatedStep;
pub use types::{AgentResponse, ReactPhase, ReactStep, Scratchpad, ScratchpadError};
