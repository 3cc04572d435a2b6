//! Moderation data model.
//!
//! All response types are constructed once by the supervisor and never
//! mutated afterwards. [`ModerationResponse`] is serializable so callers
//! can log or forward it as a plain mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Possible moderation decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    /// The request may proceed to the reasoning loop.
    Allowed,
    /// The request must not proceed.
    Rejected,
    /// The request is too ambiguous to act on; ask the user first.
    NeedsClarification,
}

/// Types of user intents the system can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    FileRead,
    FileWrite,
    FileDelete,
    FileList,
    FileListDirs,
    FileListAll,
    FileQuestion,
    ProjectAnalysis,
    GeneralQuestion,
    Unknown,
}

/// Extracted intent information.
///
/// Produced once per request by the supervisor and consumed downstream as
/// a hint for tool selection. `confidence` is only meaningful on a present
/// intent; an absent intent implies [`IntentType::Unknown`] handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentData {
    /// Classified intent type.
    pub intent_type: IntentType,

    /// Confidence score in `[0, 1]`.
    pub confidence: f64,

    /// Extracted parameters (e.g., a filename).
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,

    /// Tools the request is expected to need, in order.
    #[serde(default)]
    pub tools_needed: Vec<String>,
}

impl IntentData {
    /// Create an intent with no parameters.
    pub fn new(intent_type: IntentType, confidence: f64, tools_needed: Vec<String>) -> Self {
        Self {
            intent_type,
            confidence: confidence.clamp(0.0, 1.0),
            parameters: BTreeMap::new(),
            tools_needed,
        }
    }

    /// Attach a parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Request structure for moderation.
///
/// Immutable; created once per incoming query.
#[derive(Debug, Clone)]
pub struct ModerationRequest {
    /// The user's query to moderate.
    pub user_query: String,

    /// Unique conversation identifier.
    pub conversation_id: String,

    /// When the request was created.
    pub timestamp: SystemTime,
}

impl ModerationRequest {
    /// Create a new moderation request stamped with the current time.
    pub fn new(user_query: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            conversation_id: conversation_id.into(),
            timestamp: SystemTime::now(),
        }
    }
}

/// Response structure from moderation.
///
/// Invariant: `decision == Allowed` implies `intent` is `Some` with a
/// non-empty `tools_needed`; downstream code may rely on this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResponse {
    /// The moderation decision.
    pub decision: ModerationDecision,

    /// Whether the request is allowed (mirror of `decision` for callers
    /// that only need a boolean).
    pub allowed: bool,

    /// Extracted intent, present whenever the request is allowed.
    pub intent: Option<IntentData>,

    /// Explanation for the decision.
    pub reason: String,

    /// Identified risk factors (content-filter category names).
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

impl ModerationResponse {
    /// Build an allowed response around an extracted intent.
    pub fn allowed(intent: IntentData, reason: impl Into<String>) -> Self {
        Self {
            decision: ModerationDecision::Allowed,
            allowed: true,
            intent: Some(intent),
            reason: reason.into(),
            risk_factors: Vec::new(),
        }
    }

    /// Build a rejection with the given risk factors.
    pub fn rejected(reason: impl Into<String>, risk_factors: Vec<String>) -> Self {
        Self {
            decision: ModerationDecision::Rejected,
            allowed: false,
            intent: None,
            reason: reason.into(),
            risk_factors,
        }
    }

    /// Build a clarification request.
    pub fn needs_clarification(question: impl Into<String>) -> Self {
        Self {
            decision: ModerationDecision::NeedsClarification,
            allowed: false,
            intent: None,
            reason: question.into(),
            risk_factors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_confidence_clamped() {
        let intent = IntentData::new(IntentType::FileRead, 1.5, vec!["read_file".into()]);
        assert_eq!(intent.confidence, 1.0);

        let intent = IntentData::new(IntentType::FileRead, -0.3, vec!["read_file".into()]);
        assert_eq!(intent.confidence, 0.0);
    }

    #[test]
    fn test_intent_with_parameter() {
        let intent = IntentData::new(IntentType::FileRead, 0.9, vec!["read_file".into()])
            .with_parameter("filename", "config.txt");
        assert_eq!(
            intent.parameters.get("filename").map(String::as_str),
            Some("config.txt")
        );
    }

    #[test]
    fn test_allowed_response_carries_intent() {
        let intent = IntentData::new(IntentType::FileList, 0.8, vec!["list_files".into()]);
        let response = ModerationResponse::allowed(intent, "ok");
        assert_eq!(response.decision, ModerationDecision::Allowed);
        assert!(response.allowed);
        assert!(response.intent.is_some());
        assert!(response.risk_factors.is_empty());
    }

    #[test]
    fn test_rejected_response_has_no_intent() {
        let response =
            ModerationResponse::rejected("unsafe", vec!["destructive_command".to_string()]);
        assert_eq!(response.decision, ModerationDecision::Rejected);
        assert!(!response.allowed);
        assert!(response.intent.is_none());
        assert_eq!(response.risk_factors, vec!["destructive_command"]);
    }

    #[test]
    fn test_decision_serde_names() {
        let json = serde_json::to_string(&ModerationDecision::NeedsClarification).unwrap();
        assert_eq!(json, "\"needs_clarification\"");

        let back: ModerationDecision = serde_json::from_str("\"allowed\"").unwrap();
        assert_eq!(back, ModerationDecision::Allowed);
    }

    #[test]
    fn test_intent_type_serde_names() {
        let json = serde_json::to_string(&IntentType::FileListDirs).unwrap();
        assert_eq!(json, "\"file_list_dirs\"");

        let back: IntentType = serde_json::from_str("\"project_analysis\"").unwrap();
        assert_eq!(back, IntentType::ProjectAnalysis);
    }

    #[test]
    fn test_response_round_trip() {
        let intent = IntentData::new(IntentType::FileRead, 0.85, vec!["read_file".into()])
            .with_parameter("filename", "notes.md");
        let response = ModerationResponse::allowed(intent, "legitimate file operation");

        let value = serde_json::to_value(&response).unwrap();
        let back: ModerationResponse = serde_json::from_value(value).unwrap();

        assert_eq!(back.decision, response.decision);
        assert_eq!(back.allowed, response.allowed);
        assert_eq!(back.intent, response.intent);
    }

    #[test]
    fn test_request_new_stamps_timestamp() {
        let request = ModerationRequest::new("list files", "conv-42");
        assert_eq!(request.user_query, "list files");
        assert_eq!(request.conversation_id, "conv-42");
        assert!(request.timestamp.elapsed().is_ok());
    }
}
