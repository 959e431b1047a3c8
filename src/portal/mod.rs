//! Tax portal integration subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamConfig
//!     → client.rs (resolve endpoints, build cookie-carrying clients)
//!     → session.rs (prime → captcha → details, same cookie jar)
//!     → types.rs (wire payloads, body decoding, errors)
//! ```
//!
//! # Constraints
//! - One cookie jar per lookup; sessions never share cookies
//! - Connect and request timeouts on every upstream call
//! - Raw client internals never leave this module

pub mod client;
pub mod session;
pub mod types;

pub use client::{PortalClient, PortalEndpoints};
pub use session::UpstreamSession;
pub use types::{parse_body, DetailsQuery, UpstreamError, UpstreamReply, UpstreamResult};
