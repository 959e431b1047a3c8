//! Opaque upstream session.
//!
//! The portal ties a CAPTCHA to the later search through cookies, so every
//! request for one lookup must go through the same [`UpstreamSession`].
//! Callers only get the three operations of the lookup flow; the client and
//! its cookie jar stay private.

use bytes::Bytes;
use reqwest::{Client, Response};
use std::fmt;
use std::sync::Arc;

use crate::portal::client::PortalEndpoints;
use crate::portal::types::{parse_body, DetailsQuery, UpstreamError, UpstreamReply, UpstreamResult};

pub struct UpstreamSession {
    client: Client,
    endpoints: Arc<PortalEndpoints>,
}

impl UpstreamSession {
    pub(crate) fn new(client: Client, endpoints: Arc<PortalEndpoints>) -> Self {
        Self { client, endpoints }
    }

    /// Load the search page so the portal sets its session cookies.
    ///
    /// The status is ignored; only transport failures are errors.
    pub async fn prime(&self) -> UpstreamResult<()> {
        let url = &self.endpoints.prime;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport(url, e))?;

        let status = response.status();
        response.bytes().await.map_err(|e| transport(url, e))?;

        tracing::debug!(url = %url, status = %status, "Upstream session primed");
        Ok(())
    }

    /// Download the CAPTCHA image bound to this session.
    pub async fn fetch_captcha(&self) -> UpstreamResult<Bytes> {
        let url = &self.endpoints.captcha;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport(url, e))?;

        let response = require_success(url, response)?;
        let image = response.bytes().await.map_err(|e| transport(url, e))?;

        tracing::debug!(url = %url, bytes = image.len(), "CAPTCHA downloaded");
        Ok(image)
    }

    /// Post a taxpayer search, replaying this session's cookies.
    ///
    /// Any HTTP status is returned as data; only transport failures are
    /// errors.
    pub async fn submit_details(&self, query: &DetailsQuery) -> UpstreamResult<UpstreamReply> {
        let url = &self.endpoints.details;
        let response = self
            .client
            .post(url.clone())
            .json(query)
            .send()
            .await
            .map_err(|e| transport(url, e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| transport(url, e))?;

        tracing::debug!(url = %url, status = %status, "Taxpayer search answered");
        Ok(UpstreamReply {
            status,
            body: parse_body(text),
        })
    }
}

impl fmt::Debug for UpstreamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamSession").finish_non_exhaustive()
    }
}

fn transport(url: &url::Url, source: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        url: url.to_string(),
        source,
    }
}

fn require_success(url: &url::Url, response: Response) -> UpstreamResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(UpstreamError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}
