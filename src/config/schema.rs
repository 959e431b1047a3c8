//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the GST verification proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream tax portal settings.
    pub upstream: UpstreamConfig,

    /// Local CAPTCHA dumps for operator inspection.
    pub debug_artifacts: DebugArtifactsConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Upstream portal configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and authority of the portal, without a trailing path.
    pub base_url: String,

    /// Page requested first so the portal issues its session cookies.
    pub prime_path: String,

    /// CAPTCHA image endpoint.
    pub captcha_path: String,

    /// Taxpayer details search endpoint.
    pub details_path: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total time allowed for a single upstream request in seconds.
    pub request_timeout_secs: u64,

    /// User-Agent sent to the portal.
    pub user_agent: String,

    /// Honour HTTP(S)_PROXY environment variables for portal traffic.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://services.gst.gov.in".to_string(),
            prime_path: "/services/searchtp".to_string(),
            captcha_path: "/services/captcha".to_string(),
            details_path: "/services/api/search/taxpayerDetails".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            user_agent: concat!("gst-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            use_system_proxy: true,
        }
    }
}

/// Best-effort CAPTCHA dumps written on every fetch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugArtifactsConfig {
    /// Write the artifacts at all.
    pub enabled: bool,

    /// Directory the files are written into.
    pub directory: PathBuf,

    /// HTML wrapper embedding the image as a data URI.
    pub html_file: String,

    /// Raw image bytes.
    pub image_file: String,
}

impl Default for DebugArtifactsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("."),
            html_file: "captcha.html".to_string(),
            image_file: "captcha.png".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` mirrors any request origin.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    /// Whether any origin is accepted.
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
