//! Language normalization.
//!
//! Moderation and tool selection work on English text. Queries that do not
//! look English get one translation call through the model provider; if
//! that fails for any reason the original text is used unchanged.
//! Translation never hard-fails a request.

use log::{info, warn};
use warden_core::{LlmRequest, ModelProvider};

/// Common English function words used for cheap language detection.
const ENGLISH_INDICATORS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "it", "me", "my", "this", "that", "please", "what", "which", "show", "list",
    "read", "write", "delete", "file", "files",
];

/// Estimate how likely the query is English.
///
/// Returns the fraction of words that are common English function words.
/// Empty input counts as English (there is nothing to translate).
pub fn english_likelihood(query: &str) -> f64 {
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return 1.0;
    }

    let hits = words
        .iter()
        .filter(|word| {
            let normalized: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            ENGLISH_INDICATORS.contains(&normalized.as_str())
        })
        .count();

    hits as f64 / words.len() as f64
}

/// Normalize a query into English for classification.
///
/// Returns `(normalized_query, was_translated)`. The original query is
/// returned unchanged when:
/// - it already looks English (likelihood above `threshold`)
/// - no provider is available
/// - the translation call fails or returns empty output
pub async fn normalize_query(
    query: &str,
    provider: Option<&dyn ModelProvider>,
    threshold: f64,
) -> (String, bool) {
    if english_likelihood(query) > threshold {
        return (query.to_string(), false);
    }

    let Some(provider) = provider else {
        return (query.to_string(), false);
    };

    let request = LlmRequest::with_system(
        format!("Translate this to English: {}", query),
        "You are a translation assistant. Your only task is to translate text to English. \
         If the text is already in English, return it unchanged. Always return only the \
         translated text with no additional formatting or explanations.",
    );

    match provider.invoke(request).await {
        Ok(text) => {
            let translated = text.trim().trim_matches('"').trim_matches('\'').trim();
            if translated.is_empty() {
                warn!("Translation returned empty output, using original query");
                return (query.to_string(), false);
            }
            let was_translated = translated != query;
            info!(
                "Query normalized for moderation (translated: {})",
                was_translated
            );
            (translated.to_string(), was_translated)
        }
        Err(e) => {
            warn!("Translation failed, using original query: {}", e);
            (query.to_string(), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::{FailingProvider, ScriptedProvider};

    #[test]
    fn test_english_likelihood_english_query() {
        assert!(english_likelihood("list the files in the workspace") > 0.3);
    }

    #[test]
    fn test_english_likelihood_italian_query() {
        assert!(english_likelihood("elenca tutte le cartelle") < 0.3);
    }

    #[test]
    fn test_english_likelihood_empty() {
        assert_eq!(english_likelihood(""), 1.0);
        assert_eq!(english_likelihood("   "), 1.0);
    }

    #[test]
    fn test_english_likelihood_punctuation_stripped() {
        // "files," still counts as the indicator "files"
        assert!(english_likelihood("show files, please") > 0.3);
    }

    #[tokio::test]
    async fn test_normalize_english_passes_through() {
        let provider = ScriptedProvider::single("SHOULD NOT BE USED");
        let (normalized, translated) =
            normalize_query("list all files", Some(&provider), 0.3).await;
        assert_eq!(normalized, "list all files");
        assert!(!translated);
        assert_eq!(provider.consumed(), 0);
    }

    #[tokio::test]
    async fn test_normalize_translates_non_english() {
        let provider = ScriptedProvider::single("list all folders");
        let (normalized, translated) =
            normalize_query("elenca tutte le cartelle", Some(&provider), 0.3).await;
        assert_eq!(normalized, "list all folders");
        assert!(translated);
    }

    #[tokio::test]
    async fn test_normalize_strips_quotes_from_translation() {
        let provider = ScriptedProvider::single("\"list all folders\"");
        let (normalized, _) =
            normalize_query("elenca tutte le cartelle", Some(&provider), 0.3).await;
        assert_eq!(normalized, "list all folders");
    }

    #[tokio::test]
    async fn test_normalize_falls_back_on_provider_error() {
        let provider = FailingProvider::new();
        let (normalized, translated) =
            normalize_query("elenca tutte le cartelle", Some(&provider), 0.3).await;
        assert_eq!(normalized, "elenca tutte le cartelle");
        assert!(!translated);
    }

    #[tokio::test]
    async fn test_normalize_falls_back_on_empty_translation() {
        let provider = ScriptedProvider::single("   ");
        let (normalized, translated) =
            normalize_query("elenca tutte le cartelle", Some(&provider), 0.3).await;
        assert_eq!(normalized, "elenca tutte le cartelle");
        assert!(!translated);
    }

    #[tokio::test]
    async fn test_normalize_without_provider() {
        let (normalized, translated) =
            normalize_query("elenca tutte le cartelle", None, 0.3).await;
        assert_eq!(normalized, "elenca tutte le cartelle");
        assert!(!translated);
    }
}
