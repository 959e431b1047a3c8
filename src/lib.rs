//! GST Verification Proxy Library
//!
//! Relays CAPTCHA-gated taxpayer lookups to the GST portal. A lookup takes
//! two calls: `getCaptcha` opens a cookie-carrying portal session and stores
//! it under a fresh id; `getGSTDetails` replays that session to submit the
//! GSTIN and the operator's CAPTCHA answer.

pub mod captcha;
pub mod config;
pub mod details;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod portal;
pub mod session;

pub use config::schema::ProxyConfig;
pub use error::{GstError, GstResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
