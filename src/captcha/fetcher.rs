//! Session issuance: prime the portal, download a CAPTCHA, store both.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::captcha::artifacts::ArtifactWriter;
use crate::error::GstResult;
use crate::portal::PortalClient;
use crate::session::{SessionEntry, SessionId, SessionStore};

/// Prefix of the embeddable image returned to clients.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// What a client receives after a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptchaChallenge {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub image: String,
}

/// Encode image bytes as a PNG data URI.
pub fn to_data_uri(image: &[u8]) -> String {
    format!("{DATA_URI_PREFIX}{}", STANDARD.encode(image))
}

#[derive(Debug, Clone)]
pub struct CaptchaFetcher {
    portal: PortalClient,
    sessions: SessionStore,
    artifacts: Option<ArtifactWriter>,
}

impl CaptchaFetcher {
    pub fn new(portal: PortalClient, sessions: SessionStore, artifacts: Option<ArtifactWriter>) -> Self {
        Self {
            portal,
            sessions,
            artifacts,
        }
    }

    /// Open a portal session, fetch its CAPTCHA and register it.
    ///
    /// The entry is only stored once both upstream calls succeeded. An empty
    /// image is still stored; the raw-image endpoint reports it as missing.
    pub async fn fetch(&self) -> GstResult<CaptchaChallenge> {
        let upstream = self.portal.open_session()?;
        upstream.prime().await?;
        let image = upstream.fetch_captcha().await?;

        let id = SessionId::generate();
        let data_uri = to_data_uri(&image);

        if let Some(artifacts) = &self.artifacts {
            artifacts.write(&data_uri, &image).await;
        }

        self.sessions.put(&id, SessionEntry::new(upstream, image));
        tracing::info!(session_id = %id, "CAPTCHA session issued");

        Ok(CaptchaChallenge {
            session_id: id.into_string(),
            image: data_uri,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_encoding() {
        assert_eq!(to_data_uri(b"\x89PNG"), "data:image/png;base64,iVBORw==");
        assert_eq!(to_data_uri(&[]), "data:image/png;base64,");
    }

    #[test]
    fn test_challenge_wire_shape() {
        let challenge = CaptchaChallenge {
            session_id: "abc-123".into(),
            image: "data:image/png;base64,AA==".into(),
        };
        assert_eq!(
            serde_json::to_value(&challenge).unwrap(),
            serde_json::json!({ "sessionId": "abc-123", "image": "data:image/png;base64,AA==" })
        );
    }
}
