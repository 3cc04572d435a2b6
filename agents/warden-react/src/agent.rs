//! The ReAct reasoning loop.
//!
//! One [`ReactLoop::run`] call drives a single query to completion: a
//! bounded sequence of Think/Act/Observe iterations over the tool
//! registry, with one consolidated model call per iteration when a
//! provider is available and the deterministic rule table otherwise.
//!
//! The loop never raises to its caller. Tool failures become
//! observations; model failures degrade to deterministic selection;
//! hitting the iteration bound or the deadline produces a best-effort
//! response from whatever was observed.

use crate::config::{ReactConfig, SelectionStrategy};
use crate::fallback::{decide, ToolChoice};
use crate::selector::{build_iteration_prompt, ConsolidatedStep};
use crate::types::{AgentResponse, Scratchpad};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use warden_core::{truncate_with_count, AgentError, LlmRequest, ModelProvider, ToolRegistry};
use warden_supervisor::IntentData;

/// Maximum characters of a tool result recorded in an observation step.
/// The full result is still used for the final response.
const MAX_OBSERVATION_CHARS: usize = 2_000;

/// Queries that ask for a description or analysis are satisfied by the
/// content itself; once a read succeeds there is nothing left to gather.
fn is_analytical_query(query: &str) -> bool {
    let q = query.to_lowercase();
    ["describe", "descrivi", "analyze", "analizza", "explain", "what is"]
        .iter()
        .any(|k| q.contains(k))
}

/// Shared inputs for one reasoning run.
///
/// The provider and intent are optional: without a provider the loop runs
/// fully deterministic, and the intent is only a hint from moderation.
#[derive(Debug, Clone)]
pub struct AgentContext {
    /// Model provider for consolidated reasoning calls.
    pub provider: Option<Arc<dyn ModelProvider>>,

    /// Intent hint extracted by the supervisor.
    pub intent: Option<IntentData>,

    /// Conversation this run belongs to, for logging.
    pub conversation_id: String,
}

impl AgentContext {
    /// Create a context with no provider and no intent hint.
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            provider: None,
            intent: None,
            conversation_id: conversation_id.into(),
        }
    }

    /// Attach a model provider.
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Attach the supervisor's intent hint.
    pub fn with_intent(mut self, intent: IntentData) -> Self {
        self.intent = Some(intent);
        self
    }
}

/// Outcome of one planning (Think) phase.
struct PlannedStep {
    thought: String,
    choice: Option<ToolChoice>,
    continue_reasoning: bool,
    final_response: Option<String>,
    /// Whether the plan came from the model. A deterministic plan treats
    /// one successful tool result as satisfying the query.
    from_model: bool,
}

/// The ReAct loop.
///
/// # Example
///
/// ```no_run
/// use warden_react::{AgentContext, ReactConfig, ReactLoop};
/// use warden_core::ToolRegistry;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let agent = ReactLoop::new(ReactConfig::default())?;
/// let registry = ToolRegistry::new();
/// let context = AgentContext::new("conv-1");
/// let result = agent.run("list files", &registry, &context).await;
/// # Ok(())
/// # }
/// ```
pub struct ReactLoop {
    config: ReactConfig,
}

impl ReactLoop {
    /// Create a new loop with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if the configuration is
    /// invalid (zero iterations, zero deadline, broken prompts).
    pub fn new(config: ReactConfig) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Execute the reasoning loop for a query.
    ///
    /// Always returns an [`AgentResponse`]; every failure mode inside the
    /// loop is converted into response content and trace entries.
    pub async fn run(
        &self,
        query: &str,
        registry: &ToolRegistry,
        context: &AgentContext,
    ) -> AgentResponse {
        info!(
            "Starting reasoning loop (conversation: {}, max_iterations: {})",
            context.conversation_id, self.config.max_iterations
        );

        if registry.is_empty() {
            return AgentResponse::failure(
                "No tools are available, so this request cannot be acted on.",
            );
        }

        let mut scratchpad = Scratchpad::new(self.config.max_iterations);
        let started = Instant::now();
        let mut last_good: Option<String> = None;
        let mut fail_streaks: HashMap<String, usize> = HashMap::new();
        let mut outcome: Option<(String, bool)> = None;

        for iteration in 1..=self.config.max_iterations {
            if let Some(deadline) = self.config.deadline {
                if started.elapsed() >= deadline {
                    warn!(
                        "Deadline exceeded entering iteration {}, assembling best-effort response",
                        iteration
                    );
                    break;
                }
            }

            let planned = self.plan(query, registry, context, &scratchpad).await;

            if scratchpad.record_think(planned.thought.clone()).is_err() {
                break;
            }

            let Some(choice) = planned.choice else {
                if let Some(final_response) = planned.final_response {
                    outcome = Some((final_response, true));
                } else if !planned.continue_reasoning {
                    // The model decided no tool is needed; its thought is
                    // the best available answer.
                    outcome = Some((planned.thought, true));
                } else if !planned.from_model {
                    outcome = Some((
                        format!(
                            "I couldn't find a suitable tool for this request: {}",
                            query
                        ),
                        false,
                    ));
                } else {
                    // The model produced no action but wants to continue;
                    // give it another bounded iteration.
                    continue;
                }
                break;
            };

            if scratchpad
                .record_act(&choice.name, choice.args.clone())
                .is_err()
            {
                break;
            }

            // plan() only returns registered tools, but the registry is the
            // source of truth right up to the invocation.
            let Some(tool) = registry.get(&choice.name) else {
                let _ = scratchpad.record_observe(format!("Tool '{}' is not available", choice.name));
                continue;
            };

            debug!(
                "Invoking {} (iteration {}, args: {})",
                choice.name, iteration, choice.args
            );

            match tool.execute(choice.args.clone()).await {
                Ok(result) => {
                    let _ = scratchpad
                        .record_observe(truncate_with_count(&result.content, MAX_OBSERVATION_CHARS));
                    fail_streaks.remove(&choice.name);
                    last_good = Some(result.content.clone());

                    if let Some(final_response) = planned.final_response {
                        outcome = Some((final_response, true));
                        break;
                    }
                    if !planned.continue_reasoning
                        || !planned.from_model
                        || (is_analytical_query(query) && choice.name == "read_file")
                    {
                        // The model declared this result final, a deterministic
                        // plan just satisfied the query, or a describe/analyze
                        // request got the file content it was after.
                        outcome = Some((result.content, true));
                        break;
                    }
                }
                Err(e) => {
                    if e.is_rate_limit() {
                        // No immediate retry: a retry can only come out of
                        // the next Think phase.
                        warn!("Tool {} was rate limited", choice.name);
                    }
                    let _ = scratchpad.record_observe(format!("Tool {} failed: {}", choice.name, e));

                    let streak = fail_streaks.entry(choice.name.clone()).or_insert(0);
                    *streak += 1;
                    if *streak >= self.config.fail_streak_limit {
                        warn!(
                            "Tool {} failed {} times in a row, ending the run",
                            choice.name, streak
                        );
                        outcome = Some((
                            format!(
                                "I wasn't able to complete the request: {} kept failing ({}).",
                                choice.name, e
                            ),
                            false,
                        ));
                        break;
                    }
                }
            }
        }

        // Best-effort exit for iteration/deadline bounds: answer from the
        // last successful observation if there was one.
        let (response, success) = outcome.unwrap_or_else(|| match &last_good {
            Some(content) => (content.clone(), true),
            None => (
                "I wasn't able to complete your request. Please try rephrasing your question."
                    .to_string(),
                false,
            ),
        });

        let tools_used = scratchpad.tools_used();
        info!(
            "Reasoning loop finished (conversation: {}, success: {}, tools: {:?})",
            context.conversation_id, success, tools_used
        );

        AgentResponse {
            response,
            success,
            tools_used,
            reasoning_steps: scratchpad.into_steps(),
        }
    }

    /// Execute exactly one Think/Act/Observe pass and finalize.
    ///
    /// A cost-saving convenience: a single consolidated model call decides
    /// thought, tool, arguments, and whether the result is final. Output
    /// is structurally identical to [`run`](ReactLoop::run).
    pub async fn run_single_pass(
        &self,
        query: &str,
        registry: &ToolRegistry,
        context: &AgentContext,
    ) -> AgentResponse {
        let single = ReactLoop {
            config: ReactConfig {
                max_iterations: 1,
                ..self.config.clone()
            },
        };
        single.run(query, registry, context).await
    }

    /// Produce the plan for one iteration.
    ///
    /// Semantic strategy asks the model with the registry catalog in the
    /// prompt; any failure along that path (provider error, unparseable
    /// payload, unknown tool) degrades to the deterministic rule table.
    async fn plan(
        &self,
        query: &str,
        registry: &ToolRegistry,
        context: &AgentContext,
        scratchpad: &Scratchpad,
    ) -> PlannedStep {
        if self.config.selection == SelectionStrategy::Semantic {
            if let Some(provider) = &context.provider {
                let prompt =
                    build_iteration_prompt(&self.config.prompts, query, registry, scratchpad.steps());
                let request = LlmRequest::with_system(prompt, self.config.prompts.system.clone());

                match provider.invoke(request).await {
                    Ok(text) => {
                        if let Some(step) = ConsolidatedStep::from_model_text(&text) {
                            return self.plan_from_model(step, query, registry, context);
                        }
                        warn!("Model plan was not parseable, using deterministic selection");
                    }
                    Err(e) => {
                        warn!("Model planning failed, using deterministic selection: {}", e);
                    }
                }
            }
        }

        self.plan_deterministic(query, registry, context)
    }

    fn plan_from_model(
        &self,
        step: ConsolidatedStep,
        query: &str,
        registry: &ToolRegistry,
        context: &AgentContext,
    ) -> PlannedStep {
        let choice = match step.tool_name {
            Some(name) if registry.contains(&name) => Some(ToolChoice {
                name,
                args: step.tool_args,
            }),
            Some(name) => {
                warn!(
                    "Model chose unknown tool '{}', using deterministic selection",
                    name
                );
                decide(query, context.intent.as_ref(), registry)
            }
            None => None,
        };

        PlannedStep {
            thought: step.thinking,
            choice,
            continue_reasoning: step.continue_reasoning,
            final_response: step.final_response,
            from_model: true,
        }
    }

    fn plan_deterministic(
        &self,
        query: &str,
        registry: &ToolRegistry,
        context: &AgentContext,
    ) -> PlannedStep {
        let choice = decide(query, context.intent.as_ref(), registry);
        let thought = match &choice {
            Some(c) => format!(
                "I need to help the user with: {}. The {} tool matches this request.",
                query, c.name
            ),
            None => format!(
                "I need to help the user with: {}. No available tool matches this request.",
                query
            ),
        };

        PlannedStep {
            thought,
            choice,
            continue_reasoning: true,
            final_response: None,
            from_model: false,
        }
    }
}
