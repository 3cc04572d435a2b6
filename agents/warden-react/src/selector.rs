//! Semantic tool selection.
//!
//! Each consolidated iteration sends the model the query, the registry
//! catalog, and the recent reasoning history, and expects a single JSON
//! payload carrying all phases at once: the thought, the chosen tool and
//! arguments, whether to continue, and optionally the final response.
//!
//! Model output is never trusted: the payload is parsed defensively and
//! the chosen tool is validated against the registry by the loop, with
//! the deterministic rules as the safety net.

use crate::config::ReactPrompts;
use crate::types::{ReactPhase, ReactStep};
use serde::Deserialize;
use serde_json::Value;
use warden_core::{extract_json_object, truncate, ToolRegistry};

/// How many recent scratchpad steps are replayed into the prompt.
const HISTORY_WINDOW: usize = 6;

/// Maximum characters of each history line shown to the model.
const HISTORY_LINE_MAX: usize = 300;

/// Structured response from one consolidated reasoning call.
///
/// All fields except `thinking` are optional so that partial payloads
/// still parse; missing `continue_reasoning` defaults to `true` (keep
/// going rather than stop early on a sloppy payload).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConsolidatedStep {
    /// The model's reasoning for this iteration.
    pub thinking: String,

    /// Tool the model wants to invoke, if any.
    #[serde(default)]
    pub tool_name: Option<String>,

    /// Arguments for the tool.
    #[serde(default = "empty_object")]
    pub tool_args: Value,

    /// Whether another iteration is needed after this one.
    #[serde(default = "default_true")]
    pub continue_reasoning: bool,

    /// Final answer for the user, when the model considers the run done.
    #[serde(default)]
    pub final_response: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn default_true() -> bool {
    true
}

impl ConsolidatedStep {
    /// Parse a consolidated step from raw model text.
    ///
    /// Tolerates markdown fences and surrounding prose; returns `None`
    /// when no parseable object is found, in which case the caller falls
    /// back to deterministic selection.
    pub fn from_model_text(text: &str) -> Option<Self> {
        let value = extract_json_object(text)?;
        serde_json::from_value(value).ok()
    }
}

/// Render the registry catalog for the model.
///
/// One line per tool: name, description, and argument names pulled from
/// the parameter schema.
pub fn render_catalog(registry: &ToolRegistry) -> String {
    registry
        .catalog()
        .iter()
        .map(|meta| {
            let args: Vec<&str> = meta
                .parameters
                .get("properties")
                .and_then(Value::as_object)
                .map(|props| props.keys().map(String::as_str).collect())
                .unwrap_or_default();

            if args.is_empty() {
                format!("- {}: {}", meta.name, meta.description)
            } else {
                format!("- {}: {} (args: {})", meta.name, meta.description, args.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the recent reasoning history for the model.
pub fn render_history(steps: &[ReactStep]) -> String {
    if steps.is_empty() {
        return "No previous steps.".to_string();
    }

    let start = steps.len().saturating_sub(HISTORY_WINDOW);
    steps[start..]
        .iter()
        .map(|step| {
            let label = match step.phase {
                ReactPhase::Think => "THOUGHT",
                ReactPhase::Act => "ACTION",
                ReactPhase::Observe => "OBSERVATION",
                ReactPhase::Done => "DONE",
            };
            format!("{}: {}", label, truncate(&step.content, HISTORY_LINE_MAX))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full prompt for one consolidated iteration.
pub fn build_iteration_prompt(
    prompts: &ReactPrompts,
    query: &str,
    registry: &ToolRegistry,
    steps: &[ReactStep],
) -> String {
    prompts.render_iteration(query, &render_catalog(registry), &render_history(steps))
}
