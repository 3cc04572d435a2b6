//! Deterministic tool selection.
//!
//! The fallback strategy keeps the loop usable without a working model
//! connection and acts as the safety net when a model's tool choice is
//! invalid. Selection runs in two stages, both validated against the
//! actual registry:
//!
//! 1. the supervisor's intent hint, when its tool exists and its required
//!    arguments can be resolved
//! 2. the canonical classification table from
//!    [`warden_supervisor::classify_fallback`], which encodes the listing
//!    precedence (directory-only beats files-and-directories beats
//!    files-only beats generic list beats vague verbs)
//!
//! If neither stage yields a registered tool the result is `None` and the
//! caller must terminate with an explanatory response.

use serde_json::{json, Map, Value};
use warden_core::ToolRegistry;
use warden_supervisor::intent::{extract_filename, extract_quoted_content};
use warden_supervisor::{classify_fallback, IntentData};

/// A resolved tool invocation: a registered tool name plus arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolChoice {
    pub name: String,
    pub args: Value,
}

/// Tools that cannot run without a `filename` argument.
const NEEDS_FILENAME: &[&str] = &["read_file", "write_file", "delete_file"];

/// Decide a tool deterministically for the given query.
///
/// `intent` is the supervisor's hint; it wins when usable but the rule
/// table still answers when the hint names an unregistered tool or its
/// arguments cannot be resolved. Returns `None` when no strategy yields a
/// registered, invocable tool.
pub fn decide(
    query: &str,
    intent: Option<&IntentData>,
    registry: &ToolRegistry,
) -> Option<ToolChoice> {
    // Stage 1: intent hint
    if let Some(intent) = intent {
        for tool in &intent.tools_needed {
            if !registry.contains(tool) {
                continue;
            }
            if let Some(args) = resolve_args(tool, query, Some(intent)) {
                return Some(ToolChoice {
                    name: tool.clone(),
                    args,
                });
            }
        }
    }

    // Stage 2: canonical classification table
    let derived = classify_fallback(query, 1.0);
    for tool in &derived.tools_needed {
        if !registry.contains(tool) {
            continue;
        }
        if let Some(args) = resolve_args(tool, query, Some(&derived)) {
            return Some(ToolChoice {
                name: tool.clone(),
                args,
            });
        }
    }

    None
}

/// Resolve arguments for a tool from the intent parameters and the query
/// text. Returns `None` when a required argument cannot be resolved.
fn resolve_args(tool: &str, query: &str, intent: Option<&IntentData>) -> Option<Value> {
    let mut args = Map::new();

    if let Some(intent) = intent {
        for (key, value) in &intent.parameters {
            args.insert(key.clone(), json!(value));
        }
    }

    if NEEDS_FILENAME.contains(&tool) && !args.contains_key("filename") {
        match extract_filename(query) {
            Some(filename) => {
                args.insert("filename".to_string(), json!(filename));
            }
            None => return None,
        }
    }

    if tool == "write_file" && !args.contains_key("content") {
        if let Some(content) = extract_quoted_content(query) {
            args.insert("content".to_string(), json!(content));
        }
    }

    Some(Value::Object(args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rstest::rstest;
    use warden_core::{Tool, ToolError, ToolResult};
    use warden_supervisor::IntentType;

    #[derive(Debug)]
    struct StubTool {
        name: String,
    }

    impl StubTool {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
            }
        }
    }

    #[async_trait]
    impl Tool for StubTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, _input: Value) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::new("ok"))
        }
    }

    fn listing_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register(StubTool::new("list_files"))
            .register(StubTool::new("list_directories"))
            .register(StubTool::new("list_all"));
        registry
    }

    fn full_registry() -> ToolRegistry {
        let mut registry = listing_registry();
        registry
            .register(StubTool::new("read_file"))
            .register(StubTool::new("write_file"))
            .register(StubTool::new("delete_file"));
        registry
    }

    // The canonical selection grid over a listing-only registry
    #[rstest]
    #[case::directories("list directories", "list_directories")]
    #[case::folders("show folders", "list_directories")]
    #[case::italian_dirs("mostra cartelle", "list_directories")]
    #[case::all_of_it("list all files and directories", "list_all")]
    #[case::everything("show everything", "list_all")]
    #[case::italian_all("lista tutti i files e cartelle", "list_all")]
    #[case::files("list files", "list_files")]
    #[case::find_files("find files", "list_files")]
    #[case::generic_list("list", "list_files")]
    #[case::vague_show("show", "list_all")]
    #[case::vague_view("view", "list_all")]
    fn test_listing_precedence(#[case] query: &str, #[case] expected: &str) {
        let registry = listing_registry();
        let choice = decide(query, None, &registry).expect("a tool should be selected");
        assert_eq!(choice.name, expected, "query '{}'", query);
    }

    #[test]
    fn test_read_with_filename() {
        let registry = full_registry();
        let choice = decide("read config.txt", None, &registry).unwrap();
        assert_eq!(choice.name, "read_file");
        assert_eq!(choice.args["filename"], "config.txt");
    }

    #[test]
    fn test_read_without_filename_yields_nothing_from_hint() {
        // A read hint with no resolvable filename cannot be invoked; the
        // rule table then has nothing either for this query.
        let mut registry = ToolRegistry::new();
        registry.register(StubTool::new("read_file"));

        let intent = IntentData::new(IntentType::FileRead, 0.9, vec!["read_file".into()]);
        assert!(decide("read it", Some(&intent), &registry).is_none());
    }

    #[test]
    fn test_intent_hint_takes_priority() {
        let registry = full_registry();
        // The bare query would classify as a listing, but the hint says read
        let intent = IntentData::new(IntentType::FileRead, 0.9, vec!["read_file".into()])
            .with_parameter("filename", "notes.md");

        let choice = decide("show notes.md", Some(&intent), &registry).unwrap();
        assert_eq!(choice.name, "read_file");
        assert_eq!(choice.args["filename"], "notes.md");
    }

    #[test]
    fn test_unknown_hint_falls_through_to_rules() {
        let registry = listing_registry();
        let intent = IntentData::new(
            IntentType::GeneralQuestion,
            0.6,
            vec!["answer_question_about_files".into()],
        );

        let choice = decide("list directories", Some(&intent), &registry).unwrap();
        assert_eq!(choice.name, "list_directories");
    }

    #[test]
    fn test_write_resolves_content_and_filename() {
        let registry = full_registry();
        let choice = decide("write 'hello world' to greeting.txt", None, &registry).unwrap();
        assert_eq!(choice.name, "write_file");
        assert_eq!(choice.args["filename"], "greeting.txt");
        assert_eq!(choice.args["content"], "hello world");
    }

    #[test]
    fn test_delete_resolves_filename() {
        let registry = full_registry();
        let choice = decide("delete old_report.csv", None, &registry).unwrap();
        assert_eq!(choice.name, "delete_file");
        assert_eq!(choice.args["filename"], "old_report.csv");
    }

    #[test]
    fn test_no_match_on_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(decide("list files", None, &registry).is_none());
    }

    #[test]
    fn test_no_match_when_no_rule_applies() {
        let registry = listing_registry();
        // Classifies as a general question; no question-answering tool here
        assert!(decide("good morning to you", None, &registry).is_none());
    }

    #[test]
    fn test_hint_parameters_forwarded() {
        let registry = full_registry();
        let intent = IntentData::new(IntentType::FileWrite, 0.9, vec!["write_file".into()])
            .with_parameter("filename", "log.txt")
            .with_parameter("content", "entry one");

        let choice = decide("append to the log", Some(&intent), &registry).unwrap();
        assert_eq!(choice.name, "write_file");
        assert_eq!(choice.args["filename"], "log.txt");
        assert_eq!(choice.args["content"], "entry one");
    }
}
