//! # Warden Agent
//!
//! The composition root: [`SecureAgent`] wires the moderation gate, the
//! ReAct loop, and the tool registry into one supervised pipeline.
//!
//! Data flow per query:
//!
//! ```text
//! user query -> RequestSupervisor::moderate_request
//!            -> (if allowed) ReactLoop::run over the ToolRegistry
//!            -> AgentReply { moderation, result }
//! ```
//!
//! Rejected queries never reach the reasoning loop. Every dependency is
//! injected at construction; there are no ambient globals, so independent
//! agents (or many concurrent queries on one agent) cannot interfere with
//! each other.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use warden_agent::SecureAgent;
//! use warden_core::ToolRegistry;
//! use warden_react::{ReactConfig, ReactLoop};
//! use warden_supervisor::{RequestSupervisor, SupervisorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let supervisor = RequestSupervisor::new(SupervisorConfig::default())?;
//! let react = ReactLoop::new(ReactConfig::default())?;
//! let registry = Arc::new(ToolRegistry::new());
//!
//! let agent = SecureAgent::new(supervisor, react, registry);
//! let reply = agent.process("list files", "conv-1").await;
//! println!("allowed: {}", reply.moderation.allowed);
//! # Ok(())
//! # }
//! ```

use log::info;
use std::sync::Arc;
use warden_core::{ModelProvider, ToolRegistry};
use warden_react::{AgentContext, AgentResponse, ReactLoop};
use warden_supervisor::{ModerationResponse, RequestSupervisor};

/// Full outcome of one supervised query.
#[derive(Debug, Clone)]
pub struct AgentReply {
    /// The moderation verdict, always present.
    pub moderation: ModerationResponse,

    /// The reasoning result; `None` when moderation did not allow the
    /// query (the loop never ran).
    pub result: Option<AgentResponse>,
}

/// Supervised file-system agent.
///
/// Construct with explicit dependencies; attach a model provider with
/// [`with_provider`](SecureAgent::with_provider) to enable translation,
/// model-based moderation, and semantic tool selection. Without one,
/// every stage runs on its deterministic path.
pub struct SecureAgent {
    supervisor: RequestSupervisor,
    react: ReactLoop,
    registry: Arc<ToolRegistry>,
    provider: Option<Arc<dyn ModelProvider>>,
}

impl SecureAgent {
    /// Create an agent from its parts.
    pub fn new(supervisor: RequestSupervisor, react: ReactLoop, registry: Arc<ToolRegistry>) -> Self {
        Self {
            supervisor,
            react,
            registry,
            provider: None,
        }
    }

    /// Attach a model provider, shared by moderation and reasoning.
    ///
    /// The supervisor keeps its own copy for translation/classification.
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.supervisor = self.supervisor.with_provider(provider.clone());
        self.provider = Some(provider);
        self
    }

    /// The tool registry this agent executes against.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Process a query through moderation and, if allowed, reasoning.
    ///
    /// Never panics and never returns an error: both stages convert all
    /// internal failures into response objects.
    pub async fn process(&self, query: &str, conversation_id: &str) -> AgentReply {
        let request = self.supervisor.create_request(query, conversation_id);
        let moderation = self.supervisor.moderate_request(&request).await;

        if !moderation.allowed {
            info!(
                "Query blocked by moderation (conversation: {}, decision: {:?})",
                conversation_id, moderation.decision
            );
            return AgentReply {
                moderation,
                result: None,
            };
        }

        let mut context = AgentContext::new(conversation_id);
        if let Some(intent) = moderation.intent.clone() {
            context = context.with_intent(intent);
        }
        if let Some(provider) = self.provider.clone() {
            context = context.with_provider(provider);
        }

        let result = self.react.run(query, &self.registry, &context).await;

        AgentReply {
            moderation,
            result: Some(result),
        }
    }

    /// Process a query and flatten the outcome into one [`AgentResponse`].
    ///
    /// Rejections and clarification requests become failure responses
    /// carrying the moderation reason as the user-facing text.
    pub async fn respond(&self, query: &str, conversation_id: &str) -> AgentResponse {
        let reply = self.process(query, conversation_id).await;
        match reply.result {
            Some(result) => result,
            None => AgentResponse::failure(reply.moderation.reason),
        }
    }
}
