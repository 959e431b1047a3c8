//! Taxpayer search through a stored portal session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GstError, GstResult};
use crate::portal::DetailsQuery;
use crate::session::SessionStore;

/// Marker placed in the soft error payload.
pub const UPSTREAM_ERROR_MARKER: &str = "Upstream error";

/// Client request to look up a GSTIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstDetailsRequest {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "GSTIN")]
    pub gstin: String,
    pub captcha: String,
}

/// Result of a search the portal answered.
///
/// Both variants are sent with HTTP 200; callers detect a failed search by
/// the `error` field, not the status code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetailsOutcome {
    /// Portal body on a 2xx answer.
    Found(Value),
    /// Portal answered with a non-success status.
    UpstreamError {
        error: &'static str,
        status_code: u16,
        body: Value,
    },
}

#[derive(Debug, Clone)]
pub struct DetailsSubmitter {
    sessions: SessionStore,
}

impl DetailsSubmitter {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    /// Replay the session's cookies to submit `GSTIN` and the CAPTCHA answer.
    pub async fn submit(&self, request: GstDetailsRequest) -> GstResult<DetailsOutcome> {
        let entry = self
            .sessions
            .get(&request.session_id)
            .ok_or(GstError::InvalidSession)?;

        let query = DetailsQuery {
            gstin: request.gstin,
            captcha: request.captcha,
        };
        let reply = entry.upstream().submit_details(&query).await?;

        if reply.is_success() {
            return Ok(DetailsOutcome::Found(reply.body));
        }

        tracing::warn!(
            session_id = %request.session_id,
            status = reply.status.as_u16(),
            "Taxpayer search rejected upstream"
        );
        Ok(DetailsOutcome::UpstreamError {
            error: UPSTREAM_ERROR_MARKER,
            status_code: reply.status.as_u16(),
            body: reply.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_field_names() {
        let request: GstDetailsRequest =
            serde_json::from_value(json!({ "sessionId": "s", "GSTIN": "g", "captcha": "c" })).unwrap();
        assert_eq!(request.session_id, "s");
        assert_eq!(request.gstin, "g");
        assert_eq!(request.captcha, "c");
    }

    #[test]
    fn test_request_missing_field_rejected() {
        let result: Result<GstDetailsRequest, _> =
            serde_json::from_value(json!({ "sessionId": "s", "captcha": "c" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_soft_error_wire_shape() {
        let outcome = DetailsOutcome::UpstreamError {
            error: UPSTREAM_ERROR_MARKER,
            status_code: 503,
            body: json!({ "raw": "Service Unavailable" }),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "error": "Upstream error",
                "status_code": 503,
                "body": { "raw": "Service Unavailable" }
            })
        );
    }

    #[test]
    fn test_found_is_transparent() {
        let outcome = DetailsOutcome::Found(json!({ "lgnm": "ACME" }));
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({ "lgnm": "ACME" }));
    }

    #[tokio::test]
    async fn test_unknown_session_is_invalid() {
        let submitter = DetailsSubmitter::new(SessionStore::new());
        let err = submitter
            .submit(GstDetailsRequest {
                session_id: "unknown".into(),
                gstin: "X".into(),
                captcha: "Y".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GstError::InvalidSession));
    }
}
