// Only overview documentation that is not relevant to one of the more specific
// crates should go here.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! A web API that relays fact checking searches to a web search provider.
//!
//! VerifyIt is split into several subcrates that work in collaboration.
//!
//! - [verifyit-integration-tests](../verifyit_integration_tests/index.html)
//! - [verifyit-search](../verifyit_search/index.html)
//! - [verifyit-settings](../verifyit_settings/index.html)
//! - [verifyit-web](../verifyit_web/index.html)

mod docs;

use anyhow::{Context, Result};
use std::net::TcpListener;
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};
use verifyit_settings::{LogFormat, Settings};

/// Primary entry point
#[actix_rt::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Loading settings")?;
    init_logging(&settings).context("Initializing logging")?;
    let listener = TcpListener::bind(settings.http.listen).context("Binding port")?;

    tracing::info!(
        r#type = "verifyit.startup",
        env = %settings.env,
        listen = %settings.http.listen,
        "VerifyIt backend running"
    );

    verifyit_web::run(listener, settings)
        .context("Starting verifyit-web server")?
        .await
        .context("Running verifyit-web server")?;

    Ok(())
}

/// Set up logging for VerifyIt, based on settings and the `RUST_LOG` environment variable.
fn init_logging(settings: &Settings) -> Result<()> {
    LogTracer::init()?;
    let env_filter: EnvFilter = (&settings.logging.levels).into();
    let registry = Registry::default().with(env_filter);

    match settings.logging.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().pretty()),
        )?,
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().compact()),
        )?,
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            ),
        )?,
    };

    Ok(())
}
