//! Shared utilities for integration testing: a programmable mock portal and
//! a proxy instance wired to it.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use gst_proxy::config::ProxyConfig;
use gst_proxy::session::SessionStore;
use gst_proxy::{HttpServer, Shutdown};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const COOKIE_NAME: &str = "gst_session";
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

type DetailsFn = dyn Fn(Option<String>, Value) -> (u16, String) + Send + Sync;

/// Knobs for the mock portal's non-default behaviour.
#[derive(Debug, Clone)]
pub struct PortalBehavior {
    pub prime_status: u16,
    pub captcha_status: u16,
    pub empty_captcha: bool,
    pub details_delay: Duration,
}

impl Default for PortalBehavior {
    fn default() -> Self {
        Self {
            prime_status: 200,
            captcha_status: 200,
            empty_captcha: false,
            details_delay: Duration::ZERO,
        }
    }
}

struct PortalState {
    behavior: PortalBehavior,
    issued: AtomicU32,
    details: Box<DetailsFn>,
}

/// Mock of the tax portal.
///
/// - `/services/searchtp` sets a fresh `gst_session` cookie (`tok1`, `tok2`, ...),
///   even when told to answer with an error status
/// - `/services/captcha` answers 403 without that cookie, otherwise a PNG whose
///   tail is the cookie value, so each session gets a distinct image
/// - the details search hands the cookie value and JSON body to `details`
pub struct MockPortal {
    pub addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MockPortal {
    /// Stop accepting connections and wait until the listener is closed.
    #[allow(dead_code)]
    pub async fn stop(self) {
        let _ = self.stop.send(());
        let _ = self.task.await;
    }
}

pub async fn start_mock_portal<F>(captcha_status: u16, details: F) -> MockPortal
where
    F: Fn(Option<String>, Value) -> (u16, String) + Send + Sync + 'static,
{
    let behavior = PortalBehavior {
        captcha_status,
        ..PortalBehavior::default()
    };
    start_mock_portal_with(behavior, details).await
}

#[allow(dead_code)]
pub async fn start_mock_portal_with<F>(behavior: PortalBehavior, details: F) -> MockPortal
where
    F: Fn(Option<String>, Value) -> (u16, String) + Send + Sync + 'static,
{
    let state = Arc::new(PortalState {
        behavior,
        issued: AtomicU32::new(0),
        details: Box::new(details),
    });

    let app = Router::new()
        .route("/services/searchtp", get(search_page))
        .route("/services/captcha", get(captcha_image))
        .route("/services/api/search/taxpayerDetails", post(taxpayer_details))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel();

    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stopped.await;
            })
            .await;
    });

    MockPortal { addr, stop, task }
}

/// Image the mock serves for a given cookie value.
#[allow(dead_code)]
pub fn expected_captcha(token: &str) -> Vec<u8> {
    let mut image = PNG_MAGIC.to_vec();
    image.extend_from_slice(token.as_bytes());
    image
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(&format!("{COOKIE_NAME}=")).map(str::to_string))
}

async fn search_page(State(state): State<Arc<PortalState>>) -> impl IntoResponse {
    let n = state.issued.fetch_add(1, Ordering::SeqCst) + 1;
    (
        StatusCode::from_u16(state.behavior.prime_status).unwrap(),
        [(header::SET_COOKIE, format!("{COOKIE_NAME}=tok{n}; Path=/"))],
        "<html>search taxpayer</html>",
    )
}

async fn captcha_image(State(state): State<Arc<PortalState>>, headers: HeaderMap) -> Response {
    if state.behavior.captcha_status != 200 {
        let status = StatusCode::from_u16(state.behavior.captcha_status).unwrap();
        return (status, "captcha unavailable").into_response();
    }

    match session_cookie(&headers) {
        Some(_) if state.behavior.empty_captcha => {
            ([(header::CONTENT_TYPE, "image/png")], Vec::<u8>::new()).into_response()
        }
        Some(token) => (
            [(header::CONTENT_TYPE, "image/png")],
            expected_captcha(&token),
        )
            .into_response(),
        None => StatusCode::FORBIDDEN.into_response(),
    }
}

async fn taxpayer_details(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.behavior.details_delay.is_zero() {
        tokio::time::sleep(state.behavior.details_delay).await;
    }
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let (status, text) = (state.details)(session_cookie(&headers), json);
    (StatusCode::from_u16(status).unwrap(), text).into_response()
}

/// A running proxy pointed at a mock portal.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub sessions: SessionStore,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(upstream: SocketAddr, artifacts_dir: Option<PathBuf>) -> TestProxy {
    start_proxy_with(upstream, |config| match artifacts_dir {
        Some(dir) => {
            config.debug_artifacts.enabled = true;
            config.debug_artifacts.directory = dir;
        }
        None => config.debug_artifacts.enabled = false,
    })
    .await
}

/// Start the proxy with artifacts off and `configure` applied last.
#[allow(dead_code)]
pub async fn start_proxy_with<C>(upstream: SocketAddr, configure: C) -> TestProxy
where
    C: FnOnce(&mut ProxyConfig),
{
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{upstream}");
    config.upstream.request_timeout_secs = 5;
    config.upstream.use_system_proxy = false;
    config.debug_artifacts.enabled = false;
    configure(&mut config);

    let server = HttpServer::new(config).unwrap();
    let sessions = server.sessions().clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy {
        addr,
        sessions,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Fetch a CAPTCHA through the proxy and return the JSON body.
#[allow(dead_code)]
pub async fn fetch_captcha(proxy: &TestProxy) -> Value {
    let res = client().get(proxy.url("/api/v1/getCaptcha")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    res.json().await.unwrap()
}
