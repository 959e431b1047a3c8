//! GST Verification Proxy (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!   Client                      ┌──────────────────────────────────────────┐
//!   ─────────────────────────── │  http (axum router + tower-http layers)   │
//!   GET  /api/v1/getCaptcha  ──▶│      │                                    │
//!   POST /api/v1/getGSTDetails─▶│      ├──▶ captcha::CaptchaFetcher ──┐     │
//!   GET  /api/v1/captcha/{id}──▶│      ├──▶ details::DetailsSubmitter─┤     │
//!   GET  /                   ──▶│      │                              ▼     │        GST
//!                               │      └──▶ session::SessionStore ◀── portal ┼──────▶ portal
//!                               └──────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use gst_proxy::config::{load_config, ProxyConfig};
use gst_proxy::observability::init_logging;
use gst_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "gst-proxy")]
#[command(about = "CAPTCHA relay for GST taxpayer lookups", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the configured address.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the configured address.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    apply_overrides(&mut config, args.host.as_deref(), args.port)?;

    init_logging(&config.observability);

    tracing::info!("gst-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        debug_artifacts = config.debug_artifacts.enabled,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Replace host and/or port of the configured bind address.
fn apply_overrides(
    config: &mut ProxyConfig,
    host: Option<&str>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if host.is_none() && port.is_none() {
        return Ok(());
    }

    let current: SocketAddr = config.listener.bind_address.parse()?;
    let ip = match host {
        Some(h) => h.parse()?,
        None => current.ip(),
    };
    let addr = SocketAddr::new(ip, port.unwrap_or(current.port()));
    config.listener.bind_address = addr.to_string();
    Ok(())
}
