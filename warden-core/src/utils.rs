//! Utilities shared across the workspace.
//!
//! Pure functions with no external state: text truncation for observation
//! previews, and defensive JSON extraction from model output.

use serde_json::Value;

/// Truncate text to a maximum character count, adding ellipsis if needed.
///
/// Uses Unicode-aware character counting to handle multi-byte characters
/// correctly. Trims whitespace from input and from truncated output before
/// adding ellipsis.
///
/// # Examples
///
/// ```
/// use warden_core::truncate;
///
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("short", 10), "short");
/// ```
pub fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated.trim_end())
    }
}

/// Truncate text with total character count appended.
///
/// Similar to [`truncate`], but appends the total character count for
/// context. Useful for observations where knowing the full size helps
/// the next reasoning step.
///
/// # Examples
///
/// ```
/// use warden_core::truncate_with_count;
///
/// let long_text = "a".repeat(500);
/// let result = truncate_with_count(&long_text, 50);
/// assert!(result.ends_with("(500 chars total)"));
/// ```
pub fn truncate_with_count(s: &str, max_chars: usize) -> String {
    let s = s.trim();
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}... ({} chars total)", truncated.trim_end(), char_count)
    }
}

/// Extract the first balanced JSON object from model output.
///
/// Models frequently wrap JSON in markdown fences or surround it with
/// prose. This scans for the first `{`, tracks brace depth, and validates
/// the candidate with serde_json before returning it. Invalid candidates
/// are skipped and the scan continues.
///
/// Returns `None` if no valid JSON object is found anywhere in the text.
///
/// # Examples
///
/// ```
/// use warden_core::extract_json_object;
///
/// let fenced = "```json\n{\"tool_name\": \"list_files\"}\n```";
/// let value = extract_json_object(fenced).unwrap();
/// assert_eq!(value["tool_name"], "list_files");
///
/// assert!(extract_json_object("no json here").is_none());
/// ```
pub fn extract_json_object(s: &str) -> Option<Value> {
    let bytes = s.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'{' {
            let start = i;
            let mut depth = 0i32;
            let mut in_string = false;
            let mut escaped = false;
            let mut j = i;
            while j < bytes.len() {
                let b = bytes[j];
                if in_string {
                    if escaped {
                        escaped = false;
                    } else if b == b'\\' {
                        escaped = true;
                    } else if b == b'"' {
                        in_string = false;
                    }
                } else {
                    match b {
                        b'"' => in_string = true,
                        b'{' => depth += 1,
                        b'}' => {
                            depth -= 1;
                            if depth == 0 {
                                let candidate = &s[start..=j];
                                if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                                    return Some(value);
                                }
                                // Not valid JSON, resume scanning after this brace
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                j += 1;
            }
        }
        i += 1;
    }
    None
}
