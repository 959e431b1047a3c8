//! Portal client factory.
//!
//! Resolves the configured endpoints once and hands out independent
//! [`UpstreamSession`]s, each with its own cookie jar.

use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::portal::session::UpstreamSession;
use crate::portal::types::{UpstreamError, UpstreamResult};

/// Fully resolved portal URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalEndpoints {
    pub prime: Url,
    pub captcha: Url,
    pub details: Url,
}

impl PortalEndpoints {
    /// Resolve each configured path against the base URL.
    pub fn from_config(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base = parse_url(&config.base_url)?;
        let join = |path: &str| {
            base.join(path).map_err(|source| UpstreamError::InvalidUrl {
                url: format!("{}{}", config.base_url, path),
                source,
            })
        };

        Ok(Self {
            prime: join(&config.prime_path)?,
            captcha: join(&config.captcha_path)?,
            details: join(&config.details_path)?,
        })
    }
}

fn parse_url(raw: &str) -> UpstreamResult<Url> {
    raw.parse().map_err(|source| UpstreamError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Opens cookie-carrying sessions against the tax portal.
#[derive(Debug, Clone)]
pub struct PortalClient {
    endpoints: Arc<PortalEndpoints>,
    connect_timeout: Duration,
    request_timeout: Duration,
    user_agent: String,
    use_system_proxy: bool,
}

impl PortalClient {
    /// Create a new portal client.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let endpoints = PortalEndpoints::from_config(config)?;

        tracing::debug!(
            prime = %endpoints.prime,
            captcha = %endpoints.captcha,
            details = %endpoints.details,
            "Portal endpoints resolved"
        );

        Ok(Self {
            endpoints: Arc::new(endpoints),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            user_agent: config.user_agent.clone(),
            use_system_proxy: config.use_system_proxy,
        })
    }

    pub fn endpoints(&self) -> &PortalEndpoints {
        &self.endpoints
    }

    /// Open a fresh session with an empty cookie jar.
    pub fn open_session(&self) -> UpstreamResult<UpstreamSession> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.as_str());
        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(UpstreamError::Client)?;

        Ok(UpstreamSession::new(client, self.endpoints.clone()))
    }
}
