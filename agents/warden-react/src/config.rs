//! Configuration for the ReAct loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use warden_core::AgentError;

/// How the loop chooses tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Ask the model to pick by meaning, with the registry catalog in the
    /// prompt. Invalid picks fall back to the deterministic rules.
    #[default]
    Semantic,

    /// Use only the deterministic rule table. The loop stays usable with
    /// no model connection at all.
    Deterministic,
}

/// Prompts used by the ReAct loop.
///
/// Contains the system instruction for consolidated iterations and the
/// per-iteration template.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ReactPrompts {
    /// System instruction for the consolidated reasoning call.
    pub system: String,

    /// Template for each iteration.
    ///
    /// Placeholders: `{query}`, `{tools}`, `{history}`
    pub iteration_template: String,
}

impl ReactPrompts {
    /// Render the iteration prompt with placeholders substituted.
    pub fn render_iteration(&self, query: &str, tools: &str, history: &str) -> String {
        self.iteration_template
            .replace("{query}", query)
            .replace("{tools}", tools)
            .replace("{history}", history)
    }

    /// Validate that prompts are non-empty and contain required placeholders.
    pub fn validate(&self) -> Result<(), AgentError> {
        let mut errors = Vec::new();

        if self.system.trim().is_empty() {
            errors.push("system cannot be empty".to_string());
        }
        if self.iteration_template.trim().is_empty() {
            errors.push("iteration_template cannot be empty".to_string());
        }
        if !self.iteration_template.contains("{query}") {
            errors.push("iteration_template must contain {query}".to_string());
        }
        if !self.iteration_template.contains("{tools}") {
            errors.push("iteration_template must contain {tools}".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AgentError::InvalidConfig(errors.join("; ")))
        }
    }
}

impl Default for ReactPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a file system agent that reasons step by step and acts with tools inside a sandboxed workspace.

Respond with ONLY a JSON object, no markdown, with this structure:
{
    "thinking": "your reasoning about what to do next, in English",
    "tool_name": "a tool from the list, or null if no tool is needed",
    "tool_args": {"arg": "value"},
    "continue_reasoning": true or false,
    "final_response": "your answer to the user, or null if not done yet"
}

Rules:
1. Only pick tools from the available tools list, with arguments matching their schema
2. When an observation already answers the question, set continue_reasoning to false and write final_response
3. The final_response should match the language of the user's query
4. Never invent file contents; read them with a tool"#
                .to_string(),

            iteration_template: r#"Question: {query}

Available tools:
{tools}

{history}

Decide the next step."#
                .to_string(),
        }
    }
}

/// Configuration for the ReAct loop.
#[derive(Debug, Clone)]
pub struct ReactConfig {
    /// Maximum number of Think/Act/Observe iterations.
    ///
    /// Reaching the bound is not an error: the loop exits with a
    /// best-effort response assembled from what it observed.
    ///
    /// Default: 6
    pub max_iterations: usize,

    /// Optional wall-clock deadline for the whole run.
    ///
    /// Exceeding it takes the same best-effort exit as the iteration
    /// bound. Default: none (the iteration bound is the only cutoff).
    pub deadline: Option<Duration>,

    /// Tool selection strategy.
    ///
    /// Default: [`SelectionStrategy::Semantic`]
    pub selection: SelectionStrategy,

    /// Consecutive failures of the same tool before the loop gives up on
    /// the run with a degraded response.
    ///
    /// Default: 2
    pub fail_streak_limit: usize,

    /// Prompt configuration for consolidated iterations.
    pub prompts: ReactPrompts,
}

impl ReactConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), AgentError> {
        let mut errors = Vec::new();

        if self.max_iterations == 0 {
            errors.push("max_iterations must be greater than 0".to_string());
        }
        if self.fail_streak_limit == 0 {
            errors.push("fail_streak_limit must be greater than 0".to_string());
        }
        if let Some(deadline) = self.deadline {
            if deadline.is_zero() {
                errors.push("deadline must be greater than 0".to_string());
            }
        }
        if let Err(AgentError::InvalidConfig(prompt_errors)) = self.prompts.validate() {
            errors.push(prompt_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AgentError::InvalidConfig(errors.join("; ")))
        }
    }
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            max_iterations: 6,
            deadline: None,
            selection: SelectionStrategy::default(),
            fail_streak_limit: 2,
            prompts: ReactPrompts::default(),
        }
    }
}
