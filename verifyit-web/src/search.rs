//! Web handlers that relay searches to the upstream provider.

use actix_web::{
    post,
    web::{Data, Json, ServiceConfig},
    HttpResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use verifyit_search::{top_sources, truncate_words, SearchProvider, SearchRequest, Source};
use verifyit_settings::Settings;

use crate::errors::{HandlerError, HandlerErrorKind};

/// Configure the search routes.
pub fn configure(config: &mut ServiceConfig) {
    config.service(search).service(sources);
}

/// Body accepted by [`search`]. The query is checked by hand so that a wrong
/// type gets the same answer as a missing field.
#[derive(Debug, Default, Deserialize)]
struct SearchBody {
    /// Text to search for.
    #[serde(default)]
    query: Option<Value>,
}

/// Body accepted by [`sources`].
#[derive(Debug, Default, Deserialize)]
struct SourcesBody {
    /// Free text to find sources for.
    #[serde(default)]
    text: Option<Value>,
}

/// The response from [`sources`].
#[derive(Debug, Serialize)]
struct SourcesResponse {
    /// The leading results of the search.
    sources: Vec<Source>,
}

/// Relay a query to the search provider and return its answer untouched.
///
/// A body that is missing, isn't JSON, or has no usable `query` is rejected
/// before the provider is contacted.
#[post("/search")]
#[tracing::instrument(skip(body, provider))]
async fn search(
    body: Option<Json<SearchBody>>,
    provider: Data<dyn SearchProvider>,
) -> Result<HttpResponse, HandlerError> {
    let request =
        SearchRequest::from_json_field(body.as_ref().and_then(|body| body.query.as_ref()))?;

    let response = provider.search(request).await.map_err(|error| {
        tracing::warn!(
            %error,
            r#type = "web.search.upstream-error",
            provider = %provider.name(),
            "Search provider failed"
        );
        HandlerError::from(error)
    })?;

    Ok(HttpResponse::Ok().json(response))
}

/// Search for the beginning of a piece of text and return the top results.
#[post("/sources")]
#[tracing::instrument(skip(body, provider, settings))]
async fn sources(
    body: Option<Json<SourcesBody>>,
    provider: Data<dyn SearchProvider>,
    settings: Data<Settings>,
) -> Result<HttpResponse, HandlerError> {
    let limits = &settings.search.sources;
    let text = body
        .as_ref()
        .and_then(|body| body.text.as_ref())
        .and_then(Value::as_str)
        .ok_or(HandlerErrorKind::MissingText)?;
    let request = SearchRequest::new(truncate_words(text, limits.max_query_words))
        .map_err(|_| HandlerErrorKind::MissingText)?;

    let response = provider.search(request).await.map_err(|error| {
        tracing::error!(%error, r#type = "web.sources.error", "Error finding sources");
        HandlerErrorKind::SearchFailed
    })?;

    let sources = top_sources(&response, limits.max_sources);
    tracing::debug!(
        r#type = "web.sources.provided-count",
        source_count = sources.len(),
        "Providing sources"
    );

    Ok(HttpResponse::Ok().json(SourcesResponse { sources }))
}
