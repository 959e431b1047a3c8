//! Endpoint handlers.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::captcha::CaptchaChallenge;
use crate::details::{DetailsOutcome, GstDetailsRequest};
use crate::http::error::ApiError;
use crate::http::server::AppState;

const NO_CACHE: &str = "no-store, no-cache, must-revalidate, max-age=0";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

/// `GET /`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: "GST Verification API",
    })
}

/// `GET /api/v1/getCaptcha`
pub async fn get_captcha(State(state): State<AppState>) -> Result<Json<CaptchaChallenge>, ApiError> {
    state.captcha.fetch().await.map(Json).map_err(ApiError::captcha)
}

/// `POST /api/v1/getGSTDetails`
pub async fn get_gst_details(
    State(state): State<AppState>,
    Json(request): Json<GstDetailsRequest>,
) -> Result<Json<DetailsOutcome>, ApiError> {
    state.details.submit(request).await.map(Json).map_err(ApiError::details)
}

/// `GET /api/v1/captcha/{session_id}`
pub async fn serve_captcha(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(entry) = state.sessions.get(&session_id) else {
        return ApiError::captcha_not_found().into_response();
    };
    let image = entry.captcha();
    if image.is_empty() {
        return ApiError::captcha_not_found().into_response();
    }

    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, NO_CACHE),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        image,
    )
        .into_response()
}
