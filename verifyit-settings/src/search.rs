//! Settings for the upstream search provider.

use http::Uri;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, DurationSeconds};
use std::{fmt, time::Duration};

/// Settings for the upstream search provider.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchSettings {
    /// The URL searches are sent to, such as `https://serpapi.com/search`.
    #[serde_as(as = "DisplayFromStr")]
    pub endpoint: Uri,

    /// The key used to authenticate against the provider.
    pub api_key: ApiKey,

    /// The engine the provider should search with.
    pub engine: String,

    /// How long to wait for the provider to answer. If no value is provided,
    /// the HTTP client's defaults apply.
    #[serde_as(as = "Option<DurationSeconds>")]
    #[serde(rename = "timeout_sec", default)]
    pub timeout: Option<Duration>,

    /// Settings for the source extraction endpoint.
    #[serde(default)]
    pub sources: SourcesSettings,
}

/// Limits for turning free text into a short list of sources.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesSettings {
    /// Only this many words of the submitted text are sent to the provider.
    pub max_query_words: usize,

    /// The most sources returned for one request.
    pub max_sources: usize,
}

impl Default for SourcesSettings {
    fn default() -> Self {
        Self {
            max_query_words: 50,
            max_sources: 3,
        }
    }
}

/// A secret that must not end up in logs.
///
/// The wrapped value is only available through [`ApiKey::expose`]. The `Debug`
/// implementation prints a placeholder instead.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Access the secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True if no key was provided.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ApiKey(<empty>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}
