//! A search provider that queries [SerpApi](https://serpapi.com).

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde_json::Value;
use verifyit_settings::{ApiKey, SearchSettings};

use crate::{SearchError, SearchProvider, SearchRequest, SearchResponse, SetupError};

/// User-Agent sent to the search provider.
const REQWEST_USER_AGENT: &str = concat!("verifyit/", env!("CARGO_PKG_VERSION"));

/// A provider that relays queries to SerpApi's search endpoint.
///
/// Every call to [`SearchProvider::search`] makes exactly one HTTP request.
/// Nothing is retried or cached.
pub struct SerpApiProvider {
    /// The HTTP client to query against the external provider.
    client: reqwest::Client,
    /// Where to send searches.
    endpoint: String,
    /// Sent as the `api_key` parameter.
    api_key: ApiKey,
    /// Sent as the `engine` parameter.
    engine: String,
}

impl SerpApiProvider {
    /// Create a provider from the search settings.
    ///
    /// # Errors
    /// If no API key is configured or the HTTP client cannot be built.
    pub fn new(settings: &SearchSettings) -> Result<Self, SetupError> {
        if settings.api_key.is_empty() {
            return Err(SetupError::InvalidConfiguration(anyhow!(
                "SerpApiProvider requires an API key"
            )));
        }

        let mut builder = reqwest::Client::builder().user_agent(REQWEST_USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .context("Unable to create the Reqwest client")
            .map_err(SetupError::Network)?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.to_string(),
            api_key: settings.api_key.clone(),
            engine: settings.engine.clone(),
        })
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    fn name(&self) -> String {
        "SerpApiProvider".to_owned()
    }

    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError> {
        tracing::debug!(
            r#type = "search.serpapi.request",
            query = request.query(),
            engine = %self.engine,
            "Querying search provider"
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", request.query()),
                ("api_key", self.api_key.expose()),
                ("engine", self.engine.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(SearchError::UpstreamStatus {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let document: Value =
            serde_json::from_slice(&body).map_err(SearchError::MalformedResponse)?;
        Ok(SearchResponse(document))
    }
}

/// Sort a failed exchange into a timeout or a connectivity problem.
///
/// The request URL carries the API key, so it is stripped from the error.
fn transport_error(error: reqwest::Error) -> SearchError {
    if error.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Unreachable(error.without_url())
    }
}

/// SerpApi explains failures in the `error` field of a JSON body.
fn upstream_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::SerpApiProvider;
    use crate::{SearchError, SearchProvider, SearchRequest, SetupError};
    use httpmock::{Method::GET, MockServer};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use verifyit_settings::{SearchSettings, SourcesSettings};

    fn settings_for(endpoint: String) -> SearchSettings {
        SearchSettings {
            endpoint: endpoint.parse().expect("valid endpoint"),
            api_key: "test-key".into(),
            engine: "google".to_string(),
            timeout: None,
            sources: SourcesSettings::default(),
        }
    }

    fn climate_request() -> SearchRequest {
        SearchRequest::new("climate change facts").unwrap()
    }

    #[tokio::test]
    async fn relays_upstream_body_verbatim() {
        let server = MockServer::start_async().await;
        let upstream = json!({
            "search_metadata": {"status": "Success"},
            "organic_results": [{"title": "NASA", "link": "https://climate.nasa.gov/"}]
        });
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("q", "climate change facts")
                    .query_param("api_key", "test-key")
                    .query_param("engine", "google");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(upstream.clone());
            })
            .await;

        let provider = SerpApiProvider::new(&settings_for(server.url("/search"))).unwrap();
        let response = provider.search(climate_request()).await.unwrap();

        assert_eq!(response.into_inner(), upstream);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn error_status_is_reported_with_upstream_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(401)
                    .header("content-type", "application/json")
                    .json_body(json!({"error": "Invalid API key."}));
            })
            .await;

        let provider = SerpApiProvider::new(&settings_for(server.url("/search"))).unwrap();
        let error = provider.search(climate_request()).await.unwrap_err();

        match error {
            SearchError::UpstreamStatus { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Invalid API key."));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_status_without_json_has_no_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(503).body("Service Unavailable");
            })
            .await;

        let provider = SerpApiProvider::new(&settings_for(server.url("/search"))).unwrap();
        let error = provider.search(climate_request()).await.unwrap_err();

        assert!(matches!(
            error,
            SearchError::UpstreamStatus {
                status: 503,
                message: None
            }
        ));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let provider = SerpApiProvider::new(&settings_for(server.url("/search"))).unwrap();
        let error = provider.search(climate_request()).await.unwrap_err();

        assert!(matches!(error, SearchError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!({}));
            })
            .await;

        let mut settings = settings_for(server.url("/search"));
        settings.timeout = Some(Duration::from_millis(50));
        let provider = SerpApiProvider::new(&settings).unwrap();
        let error = provider.search(climate_request()).await.unwrap_err();

        assert!(matches!(error, SearchError::Timeout));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable_and_hides_key() {
        let provider =
            SerpApiProvider::new(&settings_for("http://127.0.0.1:1/search".to_string())).unwrap();
        let error = provider.search(climate_request()).await.unwrap_err();

        assert!(matches!(error, SearchError::Unreachable(_)));
        assert!(!format!("{:?}", error).contains("test-key"));
    }

    #[test]
    fn missing_key_is_a_setup_error() {
        let mut settings = settings_for("https://serpapi.com/search".to_string());
        settings.api_key = "".into();
        assert!(matches!(
            SerpApiProvider::new(&settings),
            Err(SetupError::InvalidConfiguration(_))
        ));
    }
}
