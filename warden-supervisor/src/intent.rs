//! Intent extraction.
//!
//! Two paths produce an [`IntentData`]:
//!
//! - the model path parses a structured classification payload returned by
//!   the provider ([`parse_intent_payload`])
//! - the deterministic path ([`classify_fallback`]) matches the query
//!   against an ordered bilingual term table, used whenever the model is
//!   unavailable or its output cannot be parsed
//!
//! The fallback is a pure function of the query text, so classification in
//! fallback mode is exactly reproducible.

use crate::types::{IntentData, IntentType};
use serde_json::Value;

// Term tables. English plus Italian, matched on whole words; multi-word
// phrases are matched as substrings of the lowercased query.

const DIRECTORY_TERMS: &[&str] = &[
    "directories",
    "directory",
    "folders",
    "folder",
    "cartelle",
    "cartella",
    "dir",
    "dirs",
    "subdirectories",
    "subdirs",
    "subfolders",
];

const FILE_TERMS: &[&str] = &["file", "files", "documento", "documenti"];

const EXPLICIT_LIST_TERMS: &[&str] = &["list", "elenca", "lista", "enumerate"];

const VAGUE_VERBS: &[&str] = &[
    "show",
    "display",
    "view",
    "see",
    "find",
    "get",
    "mostra",
    "visualizza",
    "vedi",
    "trova",
];

const ALL_TERMS: &[&str] = &["all", "everything", "tutti", "tutto", "every", "each"];

const READ_TERMS: &[&str] = &[
    "read", "open", "describe", "explain", "leggi", "apri", "descrivi", "spiega",
];

const WRITE_TERMS: &[&str] = &["write", "create", "save", "append", "scrivi", "crea", "salva"];

const DELETE_TERMS: &[&str] = &["delete", "remove", "elimina", "cancella", "rimuovi"];

const QUESTION_TERMS: &[&str] = &["what", "which", "why", "how", "cosa", "quale", "perche", "come"];

const ANALYSIS_PHRASES: &[&str] = &[
    "analyze the project",
    "analyse the project",
    "analizza il progetto",
    "project analysis",
    "project overview",
    "project structure",
    "struttura del progetto",
    "panoramica del progetto",
];

/// Lowercased view of a query with word-level and phrase-level matching.
struct QuerySignals {
    lower: String,
    words: Vec<String>,
}

impl QuerySignals {
    fn new(query: &str) -> Self {
        let lower = query.to_lowercase();
        let words = lower
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { lower, words }
    }

    fn has_word(&self, terms: &[&str]) -> bool {
        self.words.iter().any(|w| terms.contains(&w.as_str()))
    }

    fn has_phrase(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.lower.contains(p))
    }
}

/// Extract a filename from query text.
///
/// Looks for a `name.ext` shaped word, optionally quoted. Returns the
/// first match.
pub fn extract_filename(query: &str) -> Option<String> {
    for raw in query.split_whitespace() {
        let word = raw.trim_matches(|c: char| {
            c == '"' || c == '\'' || c == ',' || c == ';' || c == ':' || c == '?' || c == '!'
                || c == '(' || c == ')'
        });
        if let Some(dot) = word.rfind('.') {
            let (stem, ext) = word.split_at(dot);
            let ext = &ext[1..];
            let stem_ok = !stem.is_empty()
                && stem
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.');
            let ext_ok = !ext.is_empty() && ext.chars().all(|c| c.is_alphanumeric());
            if stem_ok && ext_ok {
                return Some(word.to_string());
            }
        }
    }
    None
}

/// Extract quoted content from a query, for write operations.
///
/// Returns the text of the first single- or double-quoted span.
pub fn extract_quoted_content(query: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let mut parts = query.splitn(3, quote);
        let _before = parts.next()?;
        if let (Some(inner), Some(_after)) = (parts.next(), parts.next()) {
            if !inner.trim().is_empty() {
                return Some(inner.to_string());
            }
        }
    }
    None
}

/// The default tool set for each intent type.
///
/// Used both by the fallback classifier and to repair model payloads that
/// omit `tools_needed`.
pub fn default_tools_for(intent_type: IntentType) -> Vec<String> {
    let tools: &[&str] = match intent_type {
        IntentType::FileRead => &["read_file"],
        IntentType::FileWrite => &["write_file"],
        IntentType::FileDelete => &["delete_file"],
        IntentType::FileList => &["list_files"],
        IntentType::FileListDirs => &["list_directories"],
        IntentType::FileListAll => &["list_all"],
        IntentType::ProjectAnalysis => &["list_files", "answer_question_about_files"],
        IntentType::FileQuestion | IntentType::GeneralQuestion => {
            &["answer_question_about_files"]
        }
        IntentType::Unknown => &["list_all"],
    };
    tools.iter().map(|s| s.to_string()).collect()
}

/// Deterministic pattern-based intent classification.
///
/// Rules are evaluated top-down; the first match wins. Listing precedence:
/// directory-only requests beat combined file+directory requests, which
/// beat file-only requests, which beat the generic list, which beats the
/// vague-verb catch-all. Mutating operations (delete, write) and reads
/// naming a concrete file are checked before any listing rule so that a
/// filename is never mistaken for a listing request.
///
/// Always returns an intent with a non-empty `tools_needed`.
pub fn classify_fallback(query: &str, confidence: f64) -> IntentData {
    let signals = QuerySignals::new(query);
    let filename = extract_filename(query);

    // Mutating operations first
    if signals.has_word(DELETE_TERMS) {
        let mut intent =
            IntentData::new(IntentType::FileDelete, confidence, default_tools_for(IntentType::FileDelete));
        if let Some(name) = filename {
            intent = intent.with_parameter("filename", name);
        }
        return intent;
    }

    if signals.has_word(WRITE_TERMS) {
        let mut intent =
            IntentData::new(IntentType::FileWrite, confidence, default_tools_for(IntentType::FileWrite));
        if let Some(name) = filename {
            intent = intent.with_parameter("filename", name);
        }
        if let Some(content) = extract_quoted_content(query) {
            intent = intent.with_parameter("content", content);
        }
        return intent;
    }

    // Reads that name a concrete file
    if signals.has_word(READ_TERMS) {
        if let Some(name) = filename.clone() {
            return IntentData::new(
                IntentType::FileRead,
                confidence,
                default_tools_for(IntentType::FileRead),
            )
            .with_parameter("filename", name);
        }
    }

    if signals.has_phrase(ANALYSIS_PHRASES) {
        return IntentData::new(
            IntentType::ProjectAnalysis,
            confidence,
            default_tools_for(IntentType::ProjectAnalysis),
        )
        .with_parameter("analysis_type", "comprehensive");
    }

    let has_dir = signals.has_word(DIRECTORY_TERMS);
    let has_file = signals.has_word(FILE_TERMS);
    let has_all = signals.has_word(ALL_TERMS);
    let has_explicit_list = signals.has_word(EXPLICIT_LIST_TERMS);
    let has_vague_verb = signals.has_word(VAGUE_VERBS);
    let has_list_signal = has_explicit_list || has_vague_verb;

    // Directory-only requests
    if has_dir && !has_file {
        return IntentData::new(
            IntentType::FileListDirs,
            confidence,
            default_tools_for(IntentType::FileListDirs),
        );
    }

    // Files and directories together, or an explicit "everything"
    if (has_file && has_dir) || (has_list_signal && has_all) {
        return IntentData::new(
            IntentType::FileListAll,
            confidence,
            default_tools_for(IntentType::FileListAll),
        );
    }

    // Files only
    if has_list_signal && has_file {
        return IntentData::new(
            IntentType::FileList,
            confidence,
            default_tools_for(IntentType::FileList),
        );
    }

    // Generic explicit list with no other signal
    if has_explicit_list {
        return IntentData::new(
            IntentType::FileList,
            confidence,
            default_tools_for(IntentType::FileList),
        );
    }

    // Vague verb alone: broadest listing
    if has_vague_verb {
        return IntentData::new(
            IntentType::FileListAll,
            confidence,
            default_tools_for(IntentType::FileListAll),
        );
    }

    // A bare filename with no verb reads best as a read request
    if let Some(name) = filename {
        return IntentData::new(
            IntentType::FileRead,
            confidence,
            default_tools_for(IntentType::FileRead),
        )
        .with_parameter("filename", name);
    }

    if signals.has_word(QUESTION_TERMS) || signals.lower.contains('?') {
        return IntentData::new(
            IntentType::FileQuestion,
            confidence,
            default_tools_for(IntentType::FileQuestion),
        );
    }

    IntentData::new(
        IntentType::GeneralQuestion,
        confidence,
        default_tools_for(IntentType::GeneralQuestion),
    )
}

/// Parse an intent object from a model classification payload.
///
/// Tolerates partial payloads: missing confidence takes the given default,
/// missing or empty `tools_needed` is repaired from the intent type.
/// Returns `None` when the intent type is absent or not a known value, so
/// the caller can fall back to pattern classification.
pub fn parse_intent_payload(value: &Value, default_confidence: f64) -> Option<IntentData> {
    let intent_type: IntentType =
        serde_json::from_value(value.get("intent_type")?.clone()).ok()?;

    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(default_confidence);

    let mut intent = IntentData::new(intent_type, confidence, Vec::new());

    if let Some(params) = value.get("parameters").and_then(Value::as_object) {
        for (key, val) in params {
            if let Some(s) = val.as_str() {
                intent.parameters.insert(key.clone(), s.to_string());
            }
        }
    }

    let tools: Vec<String> = value
        .get("tools_needed")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    intent.tools_needed = if tools.is_empty() {
        default_tools_for(intent_type)
    } else {
        tools
    };

    Some(intent)
}
