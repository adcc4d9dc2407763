#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! # VerifyIt Settings
//!
//! Configuration is specified in several ways, with later methods overriding earlier ones.
//!
//! 1. A `.env` file in the working directory, if present. Its variables are
//!    loaded into the process environment before anything else is read.
//! 2. A base configuration checked into the repository, in `config/base.yaml`.
//!    This provides the default values for most settings.
//! 3. Per-environment configuration files in the `config` directory. The
//!    environment is selected using the environment variable `VERIFYIT_ENV`.
//!    The settings for that environment are then loaded from
//!    `config/${env}.yaml`, if it exists. The default environment is
//!    "development". A "production" environment is also provided.
//! 4. A local configuration file not checked into the repository, at
//!    `config/local.yaml`. This file is in `.gitignore` and is safe to use for
//!    local configuration and secrets if desired.
//! 5. Environment variables that begin with `VERIFYIT_` and use `__` as a
//!    separator. For example, `Settings::http::workers` can be controlled from
//!    the environment variable `VERIFYIT_HTTP__WORKERS`. `RUST_LOG` is
//!    appended to `Settings::logging::levels`.
//! 6. The environment variable `SERP_API_KEY`, which sets
//!    `Settings::search::api_key` unless `VERIFYIT_SEARCH__API_KEY` is set.
//!
//! Tests should use `Settings::load_for_tests` which only reads from
//! `config/base.yaml`, `config/test.yaml`, and `config/local_test.yaml` (if it
//! exists). It does not read from environment variables.
//!
//! Configuration files are canonically YAML files. However, any format supported
//! by the [config] crate can be used, including JSON and TOML. To choose another
//! format, simply use a different extension for your file, like
//! `config/local.toml`.

mod logging;
mod search;

pub use logging::{DirectiveWrapper, LogFormat, LoggingSettings};
pub use search::{ApiKey, SearchSettings, SourcesSettings};

use config::{Config, ConfigError, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path};

/// Environment variable that holds the search provider key in older deployments.
const LEGACY_API_KEY_VAR: &str = "SERP_API_KEY";

/// Top level settings object for VerifyIt.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[doc(inline)]
pub struct Settings {
    /// The environment VerifyIt is running in. Should only be set with the
    /// `VERIFYIT_ENV` environment variable.
    pub env: String,

    /// Enable additional features to debug the application. This should not be
    /// set to true in production environments.
    pub debug: bool,

    /// Settings for the HTTP server.
    pub http: HttpSettings,

    /// Logging settings.
    pub logging: LoggingSettings,

    /// Settings for the upstream search provider.
    pub search: SearchSettings,
}

/// Settings for the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpSettings {
    /// The host and port to listen on, such as "127.0.0.1:8000" or "0.0.0.0:80".
    pub listen: SocketAddr,

    /// The number of workers to use. Optional. If no value is provided, the
    /// number of logical cores will be used.
    pub workers: Option<usize>,
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// # Errors
    /// If any of the configured values are invalid, if any of the required
    /// configuration files are missing, or if no API key for the search
    /// provider was configured.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing `.env` file is normal outside of local development.
        dotenvy::dotenv().ok();
        Self::load_from(Path::new("./config"), std::env::vars().collect())
    }

    /// Load settings from the files in `config_dir` and the variables in `vars`.
    ///
    /// This is [`Settings::load`] without touching the process environment.
    fn load_from(config_dir: &Path, vars: Map<String, String>) -> Result<Self, ConfigError> {
        let config_file = |name: &str| File::with_name(&config_dir.join(name).to_string_lossy());

        let verifyit_env = vars
            .get("VERIFYIT_ENV")
            .cloned()
            .unwrap_or_else(|| "development".to_string());

        let legacy_api_key = if vars.contains_key("VERIFYIT_SEARCH__API_KEY") {
            None
        } else {
            vars.get(LEGACY_API_KEY_VAR).cloned()
        };

        let mut settings: Self = Config::builder()
            // Start off with the base config.
            .add_source(config_file("base"))
            // Merge in an environment specific config.
            .set_override("env", verifyit_env.as_str())?
            .add_source(config_file(&verifyit_env).required(false))
            // Add a local configuration file that is `.gitignore`ed.
            .add_source(config_file("local").required(false))
            // Add environment variables that start with "VERIFYIT_" and have
            // "__" to separate levels. For example, `VERIFYIT_HTTP__LISTEN`
            // maps to `Settings::http::listen`.
            .add_source(
                Environment::with_prefix("VERIFYIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .set_override_option("search.api_key", legacy_api_key)?
            .build()?
            .try_deserialize()?;

        // RUST_LOG is always respected, and takes precedence over the config.
        if let Some(rust_log) = vars.get("RUST_LOG").filter(|value| !value.is_empty()) {
            let from_env: DirectiveWrapper = rust_log.parse().map_err(|err: anyhow::Error| {
                ConfigError::Message(format!("invalid RUST_LOG: {:#}", err))
            })?;
            settings.logging.levels += from_env;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from configuration files for tests.
    ///
    /// # Panics
    /// If the test configuration files are missing or invalid.
    pub fn load_for_tests() -> Self {
        let s = Config::builder()
            // Start off with the base config.
            .add_source(File::with_name("../config/base"))
            // Merge in test specific config.
            .set_override("env", "test")
            .expect("Could not set env for tests")
            .add_source(File::with_name("../config/test"))
            // Add a local configuration file that is `.gitignore`ed.
            .add_source(File::with_name("../config/local_test").required(false))
            .build()
            .expect("Could not load settings for tests");

        s.try_deserialize().expect("Could not convert settings")
    }

    /// Check constraints that the type system cannot express.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.api_key.is_empty() {
            return Err(ConfigError::Message(format!(
                "no search API key configured, set VERIFYIT_SEARCH__API_KEY or {}",
                LEGACY_API_KEY_VAR
            )));
        }
        if self.http.workers == Some(0) {
            return Err(ConfigError::Message(
                "http.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
