//! Pick Server Binary
//!
//! Starts the RealPick mission service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin pick-server
//! ```
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PICK_SERVER_HOST` / `PICK_SERVER_PORT`: Listener (default: 0.0.0.0:8080)
//! - `NEXT_PUBLIC_SITE_URL`: Site root used in email links (default: <https://real-pick.com>)
//! - `RESEND_API_KEY`: Resend key starting with `re_`; emails are only logged without it
//! - `RESEND_FROM_EMAIL`: Sender address or bare domain
//! - `CRON_SECRET`: Bearer secret of the cron endpoints
//! - `MARKETING_BOT_API_URL`: Marketing bot root (default: <http://localhost:3001>)
//! - `OTEL_ENABLED`, `OTEL_EXPORTER_OTLP_ENDPOINT`, `OTEL_SERVICE_NAME`: Tracing export
//! - `RUST_LOG`: Log level (default: info)

use std::time::Duration;

use anyhow::Context;
use pick_server::infrastructure::config::{Container, ServerConfig};
use pick_server::infrastructure::http;
use pick_server::infrastructure::metrics::init_metrics;
use pick_server::infrastructure::telemetry;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_ancestors();
    let _telemetry = telemetry::init();

    if init_metrics().is_none() {
        tracing::warn!("Prometheus recorder already installed, /metrics may be empty");
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting RealPick pick server");

    let config = ServerConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    let container = Container::from_config(config).context("failed to wire dependencies")?;
    let addr = container.config().bind_addr();
    let router = container.router();

    let listener = http::bind(&addr).await?;
    let shutdown_token = CancellationToken::new();
    let mut server = tokio::spawn(http::serve(listener, router, shutdown_token.clone()));

    tracing::info!("Pick server ready");
    tokio::select! {
        () = shutdown_signal() => shutdown_token.cancel(),
        result = &mut server => {
            result.context("HTTP server task panicked")??;
            return Ok(());
        }
    }

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Pick server stopped"),
        Ok(Ok(Err(e))) => return Err(e).context("HTTP server failed"),
        Ok(Err(e)) => return Err(e).context("HTTP server task panicked"),
        Err(_) => tracing::warn!(
            timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
            "Graceful shutdown timed out"
        ),
    }
    Ok(())
}

fn log_config(config: &ServerConfig) {
    tracing::info!(
        addr = %config.bind_addr(),
        site_url = %config.site_url,
        email_enabled = config.email.api_key.is_some(),
        cron_secret = config.cron_secret.is_some(),
        marketing_bot = %config.marketing_bot.base_url,
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv_from_ancestors() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
