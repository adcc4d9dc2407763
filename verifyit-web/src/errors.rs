//! Any errors that verifyit-web might generate, and supporting implementations.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use backtrace::Backtrace;
use serde_json::Value;
use thiserror::Error;
use verifyit_search::{InvalidQuery, SearchError};

/// The Standard Error for most of VerifyIt
pub struct HandlerError {
    /// The wrapped error value.
    kind: HandlerErrorKind,
    /// The backtrace related to the wrapped error.
    pub(crate) backtrace: Backtrace,
}

/// An error that happened in a web handler.
#[derive(Error, Debug)]
pub enum HandlerErrorKind {
    /// The search body had no usable query.
    #[error("{0}")]
    InvalidQuery(#[from] InvalidQuery),

    /// The sources body had no usable text.
    #[error("Missing text")]
    MissingText,

    /// Finding sources failed for any upstream reason.
    #[error("Search failed")]
    SearchFailed,

    /// The search provider did not answer in time.
    #[error("Search provider timed out")]
    UpstreamTimeout,

    /// The search provider could not be reached.
    #[error("Search provider unreachable")]
    UpstreamUnreachable,

    /// The search provider answered with an error status.
    #[error("Search provider returned status {status}{}", describe(.message))]
    UpstreamStatus {
        /// The status the provider answered with.
        status: u16,
        /// The provider's explanation, if any.
        message: Option<String>,
    },

    /// The search provider answered with something other than JSON.
    #[error("Search provider returned a malformed response")]
    UpstreamMalformed,
}

/// Format an optional upstream explanation as a suffix.
fn describe(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

impl From<SearchError> for HandlerErrorKind {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::Timeout => Self::UpstreamTimeout,
            SearchError::Unreachable(_) => Self::UpstreamUnreachable,
            SearchError::UpstreamStatus { status, message } => {
                Self::UpstreamStatus { status, message }
            }
            SearchError::MalformedResponse(_) => Self::UpstreamMalformed,
        }
    }
}

impl HandlerErrorKind {
    /// Convert the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SearchFailed => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidQuery(_) | Self::MissingText => StatusCode::BAD_REQUEST,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamUnreachable | Self::UpstreamStatus { .. } | Self::UpstreamMalformed => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl HandlerError {
    /// Access the wrapped error.
    pub fn kind(&self) -> &HandlerErrorKind {
        &self.kind
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.kind.source()
    }
}

impl<T> From<T> for HandlerError
where
    HandlerErrorKind: From<T>,
{
    fn from(item: T) -> Self {
        HandlerError {
            kind: HandlerErrorKind::from(item),
            backtrace: Backtrace::new(),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::fmt::Debug for HandlerError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Format the name of this debug struct as `HandlerError/<error name>`
        // so that different kinds are told apart in aggregated logs.
        fmt.debug_struct(&format!("HandlerError/{:?}", &self.kind))
            .field("kind", &self.kind)
            .field("backtrace", &self.backtrace)
            .finish()
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HashMap::new();
        response.insert(
            "error".to_owned(),
            Value::String(format!("{}", self.kind())),
        );
        HttpResponse::build(self.status_code()).json(response)
    }
}
