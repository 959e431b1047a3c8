//! Service-level error definitions.

use thiserror::Error;

use crate::portal::UpstreamError;

/// Errors returned by the CAPTCHA and details operations.
///
/// A non-success answer from the details search is not an error; it is
/// returned as [`crate::details::DetailsOutcome::UpstreamError`].
#[derive(Debug, Error)]
pub enum GstError {
    /// The portal could not be reached or refused the request.
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] UpstreamError),

    /// The client sent an identifier the store does not know.
    #[error("Invalid session id")]
    InvalidSession,

    /// Anything else.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Result type for service operations.
pub type GstResult<T> = Result<T, GstError>;
