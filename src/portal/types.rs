//! Upstream portal wire types and error definitions.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors that can occur while talking to the tax portal.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// A configured endpoint could not be resolved against the base URL.
    #[error("invalid upstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, TLS, timeout, or body read failure.
    #[error("upstream request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The portal answered with a status the caller cannot use.
    #[error("upstream {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// Result type for portal operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Body posted to the taxpayer details search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsQuery {
    pub gstin: String,
    pub captcha: String,
}

/// Status and decoded body of a details search.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Decode an upstream body as JSON, falling back to `{"raw": text}`.
pub fn parse_body(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => json!({ "raw": text }),
    }
}
