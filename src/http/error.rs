//! Mapping of service errors to HTTP responses.
//!
//! Server-side failures get a fixed message per endpoint; the cause is only
//! logged. Bodies use the `{"detail": ...}` shape for every error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::GstError;

pub const CAPTCHA_FAILED: &str = "Error in fetching captcha";
pub const DETAILS_FAILED: &str = "Error in fetching GST Details";
pub const CAPTCHA_NOT_FOUND: &str = "Captcha not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: &'static str,
}

impl ApiError {
    fn new(status: StatusCode, detail: &'static str) -> Self {
        Self { status, detail }
    }

    /// Error from the CAPTCHA endpoint. Always a 500.
    pub fn captcha(err: GstError) -> Self {
        tracing::error!(error = %err, "Failed to fetch CAPTCHA");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, CAPTCHA_FAILED)
    }

    /// Error from the details endpoint.
    pub fn details(err: GstError) -> Self {
        match err {
            GstError::InvalidSession => Self::new(StatusCode::BAD_REQUEST, "Invalid session id"),
            other => {
                tracing::error!(error = %other, "Failed to fetch GST details");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, DETAILS_FAILED)
            }
        }
    }

    pub fn captcha_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, CAPTCHA_NOT_FOUND)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_session_is_client_error() {
        let err = ApiError::details(GstError::InvalidSession);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "Invalid session id");
    }

    #[test]
    fn test_unexpected_details_error_hides_cause() {
        let err = ApiError::details(GstError::Unexpected("socket closed".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail, DETAILS_FAILED);
    }

    #[test]
    fn test_captcha_errors_are_server_errors() {
        let err = ApiError::captcha(GstError::InvalidSession);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail, CAPTCHA_FAILED);
    }
}
