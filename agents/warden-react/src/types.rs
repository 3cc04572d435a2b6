//! Reasoning state types.
//!
//! [`Scratchpad`] is the append-only log of one run. Its recording methods
//! enforce the structural invariants directly: step numbers increase by
//! one, an Act can only follow a Think, an Observe can only follow an Act,
//! and the log never grows past three entries per allowed iteration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Phases of the ReAct reasoning loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactPhase {
    Think,
    Act,
    Observe,
    /// Terminal phase; never recorded in the scratchpad.
    Done,
}

/// A single step in the ReAct reasoning process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactStep {
    /// Which phase this step belongs to.
    pub phase: ReactPhase,

    /// Position in the scratchpad, starting at 1.
    pub step_number: u32,

    /// Free-form content: the thought, the action description, or the
    /// observation text.
    pub content: String,

    /// Tool invoked, for Act steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Tool arguments, for Act steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_args: Option<Value>,
}

/// Violations of the scratchpad's structural invariants.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScratchpadError {
    /// The scratchpad has reached its capacity of three steps per iteration.
    #[error("Scratchpad full: {capacity} steps recorded")]
    Full { capacity: usize },

    /// A phase was recorded out of order.
    #[error("Out-of-order step: {attempted:?} cannot follow {previous:?}")]
    OutOfOrder {
        attempted: ReactPhase,
        previous: Option<ReactPhase>,
    },
}

/// The ordered log of reasoning steps for one run.
///
/// Owned exclusively by a single loop execution; append-only. Capacity is
/// fixed at construction to `max_iterations * 3` (one Think/Act/Observe
/// triple per iteration).
#[derive(Debug, Clone)]
pub struct Scratchpad {
    steps: Vec<ReactStep>,
    capacity: usize,
}

impl Scratchpad {
    /// Create an empty scratchpad sized for the given iteration bound.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            steps: Vec::new(),
            capacity: max_iterations * 3,
        }
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the scratchpad is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Maximum number of steps this scratchpad will accept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The recorded steps, in order.
    pub fn steps(&self) -> &[ReactStep] {
        &self.steps
    }

    /// Consume the scratchpad, yielding the recorded steps.
    pub fn into_steps(self) -> Vec<ReactStep> {
        self.steps
    }

    /// Names of every tool invoked, in call order, duplicates included.
    pub fn tools_used(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter(|s| s.phase == ReactPhase::Act)
            .filter_map(|s| s.tool_name.clone())
            .collect()
    }

    fn last_phase(&self) -> Option<ReactPhase> {
        self.steps.last().map(|s| s.phase)
    }

    fn record(
        &mut self,
        phase: ReactPhase,
        content: String,
        tool_name: Option<String>,
        tool_args: Option<Value>,
    ) -> Result<(), ScratchpadError> {
        if self.steps.len() >= self.capacity {
            return Err(ScratchpadError::Full {
                capacity: self.capacity,
            });
        }

        let previous = self.last_phase();
        let ordered = match phase {
            // A thought may open the run, follow an observation, or refine
            // a previous thought. It may never interrupt an Act/Observe pair.
            ReactPhase::Think => {
                matches!(previous, None | Some(ReactPhase::Observe) | Some(ReactPhase::Think))
            }
            ReactPhase::Act => matches!(previous, Some(ReactPhase::Think)),
            ReactPhase::Observe => matches!(previous, Some(ReactPhase::Act)),
            ReactPhase::Done => false,
        };
        if !ordered {
            return Err(ScratchpadError::OutOfOrder {
                attempted: phase,
                previous,
            });
        }

        self.steps.push(ReactStep {
            phase,
            step_number: self.steps.len() as u32 + 1,
            content,
            tool_name,
            tool_args,
        });
        Ok(())
    }

    /// Record a Think step.
    pub fn record_think(&mut self, content: impl Into<String>) -> Result<(), ScratchpadError> {
        self.record(ReactPhase::Think, content.into(), None, None)
    }

    /// Record an Act step for a tool invocation.
    pub fn record_act(
        &mut self,
        tool_name: impl Into<String>,
        tool_args: Value,
    ) -> Result<(), ScratchpadError> {
        let tool_name = tool_name.into();
        let content = format!("Calling {} with args: {}", tool_name, tool_args);
        self.record(ReactPhase::Act, content, Some(tool_name), Some(tool_args))
    }

    /// Record an Observe step with the tool result or failure text.
    pub fn record_observe(&mut self, content: impl Into<String>) -> Result<(), ScratchpadError> {
        self.record(ReactPhase::Observe, content.into(), None, None)
    }
}

/// Final result of a reasoning run.
///
/// Always produced, whatever happened inside the loop; `success` reports
/// whether a usable answer was assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// The natural-language response for the user.
    pub response: String,

    /// Whether the run produced a usable answer.
    pub success: bool,

    /// Every tool actually invoked, in call order, duplicates included.
    #[serde(default)]
    pub tools_used: Vec<String>,

    /// The full ordered Think/Act/Observe trace.
    #[serde(default)]
    pub reasoning_steps: Vec<ReactStep>,
}

impl AgentResponse {
    /// Build a failure response with no reasoning trace.
    pub fn failure(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            success: false,
            tools_used: Vec::new(),
            reasoning_steps: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_triple() {
        let mut pad = Scratchpad::new(3);
        pad.record_think("I should list files").unwrap();
        pad.record_act("list_files", json!({})).unwrap();
        pad.record_observe("a.txt\nb.txt").unwrap();

        assert_eq!(pad.len(), 3);
        let numbers: Vec<u32> = pad.steps().iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_act_requires_preceding_think() {
        let mut pad = Scratchpad::new(3);
        let err = pad.record_act("list_files", json!({})).unwrap_err();
        assert_eq!(
            err,
            ScratchpadError::OutOfOrder {
                attempted: ReactPhase::Act,
                previous: None,
            }
        );
    }

    #[test]
    fn test_observe_requires_preceding_act() {
        let mut pad = Scratchpad::new(3);
        pad.record_think("thinking").unwrap();
        let err = pad.record_observe("nothing happened").unwrap_err();
        assert!(matches!(err, ScratchpadError::OutOfOrder { .. }));
    }

    #[test]
    fn test_think_cannot_interrupt_act_observe_pair() {
        let mut pad = Scratchpad::new(3);
        pad.record_think("thinking").unwrap();
        pad.record_act("list_files", json!({})).unwrap();
        // The Act must be observed before the next Think
        let err = pad.record_think("skipping ahead").unwrap_err();
        assert!(matches!(err, ScratchpadError::OutOfOrder { .. }));
    }

    #[test]
    fn test_think_may_follow_think() {
        let mut pad = Scratchpad::new(3);
        pad.record_think("first thought").unwrap();
        pad.record_think("refined thought").unwrap();
        assert_eq!(pad.len(), 2);
    }

    #[test]
    fn test_capacity_is_three_per_iteration() {
        let mut pad = Scratchpad::new(1);
        assert_eq!(pad.capacity(), 3);

        pad.record_think("t").unwrap();
        pad.record_act("tool", json!({})).unwrap();
        pad.record_observe("o").unwrap();

        let err = pad.record_think("one too many").unwrap_err();
        assert_eq!(err, ScratchpadError::Full { capacity: 3 });
    }

    #[test]
    fn test_tools_used_preserves_order_and_duplicates() {
        let mut pad = Scratchpad::new(3);
        pad.record_think("t1").unwrap();
        pad.record_act("list_files", json!({})).unwrap();
        pad.record_observe("o1").unwrap();
        pad.record_think("t2").unwrap();
        pad.record_act("read_file", json!({"filename": "a.txt"})).unwrap();
        pad.record_observe("o2").unwrap();
        pad.record_think("t3").unwrap();
        pad.record_act("list_files", json!({})).unwrap();
        pad.record_observe("o3").unwrap();

        assert_eq!(pad.tools_used(), vec!["list_files", "read_file", "list_files"]);
    }

    #[test]
    fn test_act_step_carries_tool_fields() {
        let mut pad = Scratchpad::new(2);
        pad.record_think("t").unwrap();
        pad.record_act("read_file", json!({"filename": "x.txt"})).unwrap();

        let act = &pad.steps()[1];
        assert_eq!(act.tool_name.as_deref(), Some("read_file"));
        assert_eq!(act.tool_args.as_ref().unwrap()["filename"], "x.txt");
        assert!(act.content.contains("read_file"));
    }

    #[test]
    fn test_agent_response_round_trip() {
        let mut pad = Scratchpad::new(1);
        pad.record_think("t").unwrap();
        pad.record_act("list_files", json!({})).unwrap();
        pad.record_observe("a.txt").unwrap();

        let response = AgentResponse {
            response: "a.txt".to_string(),
            success: true,
            tools_used: pad.tools_used(),
            reasoning_steps: pad.into_steps(),
        };

        let value = serde_json::to_value(&response).unwrap();
        let back: AgentResponse = serde_json::from_value(value).unwrap();
        assert_eq!(back.success, response.success);
        assert_eq!(back.tools_used, response.tools_used);
        assert_eq!(back.reasoning_steps.len(), 3);
    }

    #[test]
    fn test_failure_response() {
        let response = AgentResponse::failure("no tools available");
        assert!(!response.success);
        assert!(response.tools_used.is_empty());
        assert!(response.reasoning_steps.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// However many triples are recorded, step numbers increase
            /// strictly by one from 1.
            #[test]
            fn step_numbers_strictly_increase(iterations in 1usize..12) {
                let mut pad = Scratchpad::new(iterations);
                for _ in 0..iterations {
                    pad.record_think("t").unwrap();
                    pad.record_act("tool", json!({})).unwrap();
                    pad.record_observe("o").unwrap();
                }

                for (index, step) in pad.steps().iter().enumerate() {
                    prop_assert_eq!(step.step_number as usize, index + 1);
                }
                prop_assert_eq!(pad.len(), iterations * 3);

                // And the next record attempt is rejected
                prop_assert!(pad.record_think("extra").is_err());
            }
        }
    }
}
