//! Tools for running tests

use httpmock::MockServer;
use reqwest::{redirect, Client, ClientBuilder, RequestBuilder};
use std::{future::Future, net::TcpListener};
use tracing_futures::{Instrument, WithSubscriber};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};
use verifyit_settings::Settings;

/// Run a test with a fully configured VerifyIt server.
///
/// The server will listen on a port assigned arbitrarily by the OS.
///
/// A suite of tools will be passed to the test function in the form of an
/// instance of [`TestingTools`]. It includes an HTTP client configured to use
/// the test server, and an HTTP mock server that the search provider has been
/// configured to send queries to.
///
/// # Example
///
/// ```no_run
/// # use verifyit_integration_tests::{verifyit_test, TestingTools};
/// #[actix_rt::test]
/// async fn a_test() {
///     verifyit_test(
///         |settings| settings.search.engine = "bing".to_string(),
///         |TestingTools { test_client, search_mock, .. }| async move {
///             assert!(true) // Test goes here
///         }
///     ).await
/// }
/// ```
///
/// # Panics
/// May panic if tests could not be set up correctly.
pub async fn verifyit_test<FSettings, FTest, Fut>(
    settings_changer: FSettings,
    test: FTest,
) -> Fut::Output
where
    FSettings: FnOnce(&mut Settings),
    FTest: FnOnce(TestingTools) -> Fut,
    Fut: Future,
{
    let test_span = tracing::info_span!("verifyit_test");

    // Load settings
    let mut settings = Settings::load_for_tests();

    // Set up logging
    let env_filter: EnvFilter = (&settings.logging.levels).into();
    let tracing_subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty().with_test_writer());
    let _tracing_subscriber_guard = tracing::subscriber::set_default(tracing_subscriber);

    // Set up a mock server for the search provider to talk to
    let search_mock = MockServer::start_async().await;
    settings.search.endpoint = search_mock
        .url("/search")
        .parse()
        .expect("mock server URL should be a valid URI");

    settings_changer(&mut settings);

    // Run server in the background
    let listener = TcpListener::bind(settings.http.listen).expect("Failed to bind to a port");
    let address = listener
        .local_addr()
        .expect("Listener has no local address")
        .to_string();
    let server = verifyit_web::run(listener, settings).expect("Failed to start server");
    let server_handle = tokio::spawn(server.with_current_subscriber());
    let test_client = TestReqwestClient::new(address);

    // Assemble the tools
    let tools = TestingTools {
        test_client,
        search_mock,
    };
    // Run the test
    let rv = test(tools).instrument(test_span).await;
    server_handle.abort();
    rv
}

/// A set of tools for tests, including mock servers.
///
/// The fields of this struct are marked as non-exhaustive, meaning that any
/// destructuring of this struct will require a `..` "and the rest" entry, even
/// if all present items are named. This makes adding tools in the future easier,
/// since old tests won't need to be rewritten to account for the added tools.
#[non_exhaustive]
pub struct TestingTools {
    /// A wrapper around a `reqwest::client` that automatically uses the VerifyIt
    /// server under test.
    pub test_client: TestReqwestClient,

    /// A [`httpmock::MockServer`] that the search provider has been configured
    /// to use, at the path `/search`. Does not contain mock responses, any
    /// needed must be added.
    pub search_mock: MockServer,
}

/// A wrapper around a `[reqwest::client]` that automatically sends requests to
/// the test server.
///
/// The client is configured to not follow any redirects.
pub struct TestReqwestClient {
    /// The wrapped client.
    client: Client,

    /// The server address to implicitly use for all requests.
    address: String,
}

impl TestReqwestClient {
    /// Construct a new test client that uses `address` for every request given.
    pub fn new(address: String) -> Self {
        let client = ClientBuilder::new()
            .redirect(redirect::Policy::none())
            .build()
            .expect("Could not build test client");
        Self { client, address }
    }

    /// Start building a request to the test server with the method and path
    /// specified.
    ///
    /// The path should start with `/`, such as `/search`.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        assert!(path.starts_with('/'));
        let url = format!("http://{}{}", &self.address, path);
        self.client.request(method, url)
    }

    /// Start building a GET request to the test server with the path specified.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    /// Start building a POST request to the test server with the path specified.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::POST, path)
    }
}
