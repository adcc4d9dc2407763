//! Reduce a search response to a short list of sources.

use serde::Serialize;
use serde_json::Value;

use crate::SearchResponse;

/// A page that may back up a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// The page title, as reported by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Where the page lives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Keep the first `max_words` whitespace separated words of `text`, joined by
/// single spaces.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The first `limit` organic results in `response`.
///
/// Responses without an `organic_results` array produce no sources.
pub fn top_sources(response: &SearchResponse, limit: usize) -> Vec<Source> {
    response
        .0
        .get("organic_results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .take(limit)
                .map(|result| Source {
                    title: string_field(result, "title"),
                    url: string_field(result, "link"),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Read `name` from `value` if it is a string.
fn string_field(value: &Value, name: &str) -> Option<String> {
    value.get(name).and_then(Value::as_str).map(ToOwned::to_owned)
}
