#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Web server for [VerifyIt](../verifyit/index.html)'s public API.

mod errors;
mod logging;
mod search;

use std::{net::TcpListener, sync::Arc};

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use anyhow::Context;
use serde::Serialize;
use tracing_actix_web::TracingLogger;
use verifyit_search::{SearchProvider, SerpApiProvider};
use verifyit_settings::Settings;

use crate::logging::VerifyItRootSpanBuilder;

pub use crate::errors::{HandlerError, HandlerErrorKind};

/// The message reported by the health check.
pub const HEALTH_MESSAGE: &str = "VerifyIT Flask backend is running";

/// Run the web server
///
/// The returned server is a `Future` that must either be `.await`ed, or run it
/// as a background task using `tokio::spawn`.
///
/// Most of the details from `settings` will be respected, except for those that
/// go into building the listener (the host and port). If you want to respect the
/// settings specified in that object, you must include them in the construction
/// of `listener`.
///
/// # Errors
///
/// Returns an error if the search provider cannot be configured, or if the
/// server cannot be started on the provided listener.
///
/// # Examples
///
/// Run the server in the foreground. This will only return if there is an error
/// that causes the server to shut down. This is used to run VerifyIt as a
/// service, such as in production.
///
/// ```no_run
/// # tokio_test::block_on(async {
/// let listener = std::net::TcpListener::bind("127.0.0.1:8000")
///     .expect("Failed to bind port");
/// let settings = verifyit_settings::Settings::load()
///     .expect("Failed to load settings");
/// verifyit_web::run(listener, settings)
///     .expect("Failed to start server")
///     .await
///     .expect("Fatal error while running server");
/// # })
/// ```
pub fn run(listener: TcpListener, settings: Settings) -> anyhow::Result<Server> {
    let provider =
        SerpApiProvider::new(&settings.search).context("Setting up the search provider")?;
    run_with_provider(listener, settings, Arc::new(provider))
}

/// Run the web server with a specific search provider.
///
/// This is [`run`] without building the provider from `settings`, so that a
/// substitute can be supplied.
///
/// # Errors
///
/// Returns an error if the server cannot be started on the provided listener.
pub fn run_with_provider(
    listener: TcpListener,
    settings: Settings,
    provider: Arc<dyn SearchProvider>,
) -> anyhow::Result<Server> {
    let num_workers = settings.http.workers;

    tracing::info!(
        r#type = "web.starting",
        provider = %provider.name(),
        address = ?listener.local_addr().ok(),
        "Starting web server"
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(settings.clone()))
            .app_data(Data::from(provider.clone()))
            .wrap(TracingLogger::<VerifyItRootSpanBuilder>::new())
            .wrap(Cors::permissive())
            .configure(configure)
    })
    .listen(listener)
    .context("Listening for connections")?;

    if let Some(n) = num_workers {
        server = server.workers(n);
    }

    Ok(server.run())
}

/// Register every route. Does not include middleware or app data.
fn configure(config: &mut web::ServiceConfig) {
    config
        // The core functionality of VerifyIt
        .configure(search::configure)
        .service(web::resource("/").to(health));
}

/// The payload of the health check.
#[derive(Debug, Serialize)]
struct HealthResponse {
    /// A human readable description of the service.
    msg: &'static str,
    /// Always `"ok"`.
    status: &'static str,
}

/// The root view, used by infrastructure and people to check that the service
/// is alive. Answers every method the same way.
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        msg: HEALTH_MESSAGE,
        status: "ok",
    })
}

#[cfg(test)]
mod tests {
    use super::configure;
    use actix_web::{
        http::{Method, StatusCode},
        test,
        web::Data,
        App,
    };
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use verifyit_search::{SearchError, SearchProvider, SearchRequest, SearchResponse};
    use verifyit_settings::Settings;

    /// A provider that remembers every query and answers with a canned result.
    struct RecordingProvider {
        queries: Mutex<Vec<String>>,
        answer: fn() -> Result<SearchResponse, SearchError>,
    }

    impl RecordingProvider {
        fn answering(answer: fn() -> Result<SearchResponse, SearchError>) -> Arc<Self> {
            Arc::new(Self {
                queries: Mutex::new(Vec::new()),
                answer,
            })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchProvider for RecordingProvider {
        fn name(&self) -> String {
            "RecordingProvider".to_owned()
        }

        async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError> {
            self.queries.lock().unwrap().push(request.query().to_owned());
            (self.answer)()
        }
    }

    fn empty_results() -> Result<SearchResponse, SearchError> {
        Ok(SearchResponse(json!({"results": []})))
    }

    fn organic_results() -> Result<SearchResponse, SearchError> {
        Ok(SearchResponse(json!({
            "organic_results": [
                {"title": "A", "link": "https://a.example/"},
                {"title": "B", "link": "https://b.example/"},
                {"title": "C", "link": "https://c.example/"},
                {"title": "D", "link": "https://d.example/"},
            ]
        })))
    }

    fn timed_out() -> Result<SearchResponse, SearchError> {
        Err(SearchError::Timeout)
    }

    /// Send `request` to an app backed by `provider` and return the status and JSON body.
    async fn call(
        provider: Arc<RecordingProvider>,
        request: test::TestRequest,
    ) -> (StatusCode, Value) {
        let provider: Arc<dyn SearchProvider> = provider;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(Settings::load_for_tests()))
                .app_data(Data::from(provider))
                .configure(configure),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }

    #[actix_rt::test]
    async fn root_answers_every_method() {
        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            let (status, body) = call(
                RecordingProvider::answering(empty_results),
                test::TestRequest::default().method(method).uri("/"),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body,
                json!({"msg": "VerifyIT Flask backend is running", "status": "ok"})
            );
        }
    }

    #[actix_rt::test]
    async fn search_relays_the_provider_answer() {
        let provider = RecordingProvider::answering(empty_results);
        let (status, body) = call(
            provider.clone(),
            test::TestRequest::post()
                .uri("/search")
                .set_json(json!({"query": "climate change facts"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"results": []}));
        assert_eq!(provider.queries(), vec!["climate change facts".to_string()]);
    }

    #[actix_rt::test]
    async fn invalid_queries_never_reach_the_provider() {
        for payload in [
            json!({}),
            json!({"query": ""}),
            json!({"query": null}),
            json!({"query": 7}),
        ] {
            let provider = RecordingProvider::answering(empty_results);
            let (status, body) = call(
                provider.clone(),
                test::TestRequest::post().uri("/search").set_json(payload),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "No query provided"}));
            assert!(provider.queries().is_empty());
        }
    }

    #[actix_rt::test]
    async fn search_without_json_body_is_a_bad_request() {
        let provider = RecordingProvider::answering(empty_results);
        let (status, body) = call(
            provider.clone(),
            test::TestRequest::post()
                .uri("/search")
                .set_payload("query=climate"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No query provided"}));
        assert!(provider.queries().is_empty());
    }

    #[actix_rt::test]
    async fn search_timeout_is_a_gateway_timeout() {
        let (status, body) = call(
            RecordingProvider::answering(timed_out),
            test::TestRequest::post()
                .uri("/search")
                .set_json(json!({"query": "climate"})),
        )
        .await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body, json!({"error": "Search provider timed out"}));
    }

    #[actix_rt::test]
    async fn sources_returns_the_top_three() {
        let provider = RecordingProvider::answering(organic_results);
        let text = (1..=60).map(|n| format!("w{}", n)).collect::<Vec<_>>().join(" ");
        let (status, body) = call(
            provider.clone(),
            test::TestRequest::post()
                .uri("/sources")
                .set_json(json!({ "text": text })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"sources": [
                {"title": "A", "url": "https://a.example/"},
                {"title": "B", "url": "https://b.example/"},
                {"title": "C", "url": "https://c.example/"},
            ]})
        );
        let queries = provider.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].split(' ').count(), 50);
        assert!(queries[0].ends_with("w50"));
    }

    #[actix_rt::test]
    async fn sources_requires_text() {
        for payload in [
            json!({"query": "wrong field"}),
            json!({"text": null}),
            json!({"text": 42}),
            json!({"text": ""}),
            json!({"text": "   \n\t "}),
        ] {
            let provider = RecordingProvider::answering(organic_results);
            let (status, body) = call(
                provider.clone(),
                test::TestRequest::post().uri("/sources").set_json(payload),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "Missing text"}));
            assert!(provider.queries().is_empty());
        }
    }

    #[actix_rt::test]
    async fn sources_hides_upstream_detail() {
        let (status, body) = call(
            RecordingProvider::answering(timed_out),
            test::TestRequest::post()
                .uri("/sources")
                .set_json(json!({"text": "the moon landing was staged"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Search failed"}));
    }
}
