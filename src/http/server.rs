//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the portal client, session store and services from config
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, CORS, timeout)
//! - Serve on a listener until a shutdown signal arrives

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::captcha::{ArtifactWriter, CaptchaFetcher};
use crate::config::{CorsConfig, ProxyConfig};
use crate::details::DetailsSubmitter;
use crate::http::handlers;
use crate::lifecycle::signals::wait_for_signal;
use crate::portal::{PortalClient, UpstreamResult};
use crate::session::SessionStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub captcha: CaptchaFetcher,
    pub details: DetailsSubmitter,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wire the services around one shared session store.
    pub fn from_config(config: &ProxyConfig) -> UpstreamResult<Self> {
        let portal = PortalClient::new(&config.upstream)?;
        let sessions = SessionStore::new();
        let artifacts = ArtifactWriter::from_config(&config.debug_artifacts);

        Ok(Self {
            captcha: CaptchaFetcher::new(portal, sessions.clone(), artifacts),
            details: DetailsSubmitter::new(sessions.clone()),
            sessions,
        })
    }
}

/// HTTP server for the GST verification API.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    sessions: SessionStore,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> UpstreamResult<Self> {
        let state = AppState::from_config(&config)?;
        let sessions = state.sessions.clone();
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            sessions,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::health))
            .route("/api/v1/getCaptcha", get(handlers::get_captcha))
            .route("/api/v1/getGSTDetails", post(handlers::get_gst_details))
            .route("/api/v1/captcha/{session_id}", get(handlers::serve_captcha))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(cors_layer(&config.cors))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle on the session store shared with the handlers.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run the server until an OS signal or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = wait_for_signal() => {}
                    _ = shutdown.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!(sessions = self.sessions.len(), "HTTP server stopped");
        Ok(())
    }
}

/// Request span carrying the ID assigned by `SetRequestIdLayer`.
fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any() {
        return CorsLayer::very_permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
