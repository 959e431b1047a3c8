//! Observability subsystem.
//!
//! All subsystems emit `tracing` events with structured fields
//! (`session_id`, `status`, `error`); `logging.rs` installs the subscriber.
//! Request IDs come from the HTTP middleware and appear in request spans.

pub mod logging;

pub use logging::init_logging;
