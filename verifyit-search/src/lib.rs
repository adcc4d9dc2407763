#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Web search backends for [VerifyIt](../verifyit/index.html).
//!
//! A [`SearchProvider`] takes a validated [`SearchRequest`] and returns the
//! provider's answer as an opaque [`SearchResponse`]. The only production
//! provider is [`SerpApiProvider`].

mod serpapi;
mod sources;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use crate::serpapi::SerpApiProvider;
pub use crate::sources::{top_sources, truncate_words, Source};

/// A request for search results.
///
/// The query is never empty. The only way to build one is through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// The text to search for.
    query: String,
}

impl SearchRequest {
    /// Build a request from the `query` field of a JSON body.
    ///
    /// # Errors
    /// If the field is absent, `null`, not a string, or an empty string.
    pub fn from_json_field(field: Option<&Value>) -> Result<Self, InvalidQuery> {
        match field.and_then(Value::as_str) {
            Some(query) => Self::new(query),
            None => Err(InvalidQuery),
        }
    }

    /// Build a request for `query`.
    ///
    /// # Errors
    /// If `query` is empty.
    pub fn new<S: Into<String>>(query: S) -> Result<Self, InvalidQuery> {
        let query = query.into();
        if query.is_empty() {
            Err(InvalidQuery)
        } else {
            Ok(Self { query })
        }
    }

    /// The text to search for.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// The provider's answer to a search. Its structure is not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchResponse(pub Value);

impl SearchResponse {
    /// Unwrap the JSON document.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// A backend that can answer search queries.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// An operator-visible name for this search provider.
    fn name(&self) -> String;

    /// Search for `request` and return whatever the backend answered.
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError>;
}

/// The query in a request was missing or unusable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("No query provided")]
pub struct InvalidQuery;

/// Errors that may occur while setting up the provider.
#[derive(Debug, Error)]
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
pub enum SetupError {
    #[error("This search provider cannot be used with the current VerifyIt configuration")]
    InvalidConfiguration(#[source] anyhow::Error),

    #[error("There was a network error while setting up this search provider")]
    Network(#[source] anyhow::Error),
}

/// Errors that may occur while querying the upstream provider.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider did not answer within the configured timeout.
    #[error("The search provider did not respond in time")]
    Timeout,

    /// The provider could not be reached, or the connection broke.
    #[error("The search provider could not be reached: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("The search provider returned status {status}")]
    UpstreamStatus {
        /// The HTTP status code of the response.
        status: u16,
        /// The provider's own explanation, if it gave one.
        message: Option<String>,
    },

    /// The provider's body was not a JSON document.
    #[error("The search provider returned a malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::{InvalidQuery, SearchRequest, SearchResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn query_field_must_be_a_non_empty_string() {
        assert_eq!(SearchRequest::from_json_field(None), Err(InvalidQuery));
        assert_eq!(
            SearchRequest::from_json_field(Some(&json!(null))),
            Err(InvalidQuery)
        );
        assert_eq!(
            SearchRequest::from_json_field(Some(&json!(""))),
            Err(InvalidQuery)
        );
        assert_eq!(
            SearchRequest::from_json_field(Some(&json!(42))),
            Err(InvalidQuery)
        );
        assert_eq!(
            SearchRequest::from_json_field(Some(&json!(["climate"]))),
            Err(InvalidQuery)
        );
    }

    #[test]
    fn valid_query_is_kept_verbatim() {
        let request = SearchRequest::from_json_field(Some(&json!("climate change facts")))
            .expect("valid query");
        assert_eq!(request.query(), "climate change facts");

        // Only the empty string is rejected.
        let request = SearchRequest::new("  ").expect("whitespace is forwarded");
        assert_eq!(request.query(), "  ");
    }

    #[test]
    fn invalid_query_message() {
        assert_eq!(InvalidQuery.to_string(), "No query provided");
    }

    #[test]
    fn response_serializes_transparently() {
        let response = SearchResponse(json!({"results": []}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"results": []})
        );
    }
}
