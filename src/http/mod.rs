//! HTTP facade subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, CORS, timeout)
//!     → handlers.rs (extract, call CaptchaFetcher / DetailsSubmitter / store)
//!     → error.rs (GstError → status + {"detail": ...})
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
