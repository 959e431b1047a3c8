//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected so an operator sees every mistake in one run.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url '{0}' must be an absolute http(s) URL")]
    BaseUrl(String),

    #[error("upstream.{field} '{value}' must start with '/'")]
    Path { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("debug_artifacts.{0} must not be empty")]
    EmptyFileName(&'static str),

    #[error("cors.allowed_origins must not be empty")]
    NoOrigins,
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let upstream = &config.upstream;
    match Url::parse(&upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::BaseUrl(upstream.base_url.clone())),
    }

    for (field, value) in [
        ("prime_path", &upstream.prime_path),
        ("captcha_path", &upstream.captcha_path),
        ("details_path", &upstream.details_path),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::Path { field, value: value.clone() });
        }
    }

    if upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.connect_timeout_secs"));
    }
    if upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.request_timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    if config.debug_artifacts.html_file.trim().is_empty() {
        errors.push(ValidationError::EmptyFileName("html_file"));
    }
    if config.debug_artifacts.image_file.trim().is_empty() {
        errors.push(ValidationError::EmptyFileName("image_file"));
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::NoOrigins);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
