//! Marketing Bot Binary
//!
//! Starts the RealPick crawler and mission draft service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin marketing-bot
//! MARKETING_CONFIG=marketing.yaml cargo run --bin marketing-bot
//! ```
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MARKETING_CONFIG`: YAML settings file (default: marketing.yaml)
//! - `MARKETING_BOT_PORT`: Listener port (default: 3001)
//! - `YOUTUBE_API_KEY`: YouTube Data API key; crawls fail with 501 without it
//! - `GEMINI_API_KEY`: Gemini key; screening, drafts and comments fail without it
//! - `NAVER_CLIENT_ID` / `NAVER_CLIENT_SECRET`: Naver open API credentials
//! - `CRON_SECRET`: Bearer secret of the daily run endpoint
//! - `OTEL_ENABLED`, `OTEL_EXPORTER_OTLP_ENDPOINT`, `OTEL_SERVICE_NAME`: Tracing export
//! - `RUST_LOG`: Log level (default: info)

use std::time::Duration;

use anyhow::Context;
use marketing_bot::infrastructure::config::{BotConfig, Container, load_config};
use marketing_bot::infrastructure::http;
use marketing_bot::infrastructure::metrics::init_metrics;
use pick_server::infrastructure::telemetry::{self, TelemetryConfig};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_ancestors();
    let _telemetry = telemetry::init_with_config(TelemetryConfig::from_env_for(
        "realpick-marketing-bot",
        "marketing_bot",
    ));

    if init_metrics().is_none() {
        tracing::warn!("Prometheus recorder already installed, /metrics may be empty");
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting RealPick marketing bot");

    let config = load_config(None).context("invalid configuration")?;
    log_config(&config);

    let container = Container::from_config(config).context("failed to wire dependencies")?;
    let addr = format!(
        "{}:{}",
        container.config().server.host,
        container.config().server.port
    );
    let router = container.router();

    let listener = http::bind(&addr).await?;
    let shutdown_token = CancellationToken::new();
    let mut server = tokio::spawn(http::serve(listener, router, shutdown_token.clone()));

    tracing::info!("Marketing bot ready");
    tokio::select! {
        () = shutdown_signal() => shutdown_token.cancel(),
        result = &mut server => {
            result.context("HTTP server task panicked")??;
            return Ok(());
        }
    }

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Marketing bot stopped"),
        Ok(Ok(Err(e))) => return Err(e).context("HTTP server failed"),
        Ok(Err(e)) => return Err(e).context("HTTP server task panicked"),
        Err(_) => tracing::warn!(
            timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
            "Graceful shutdown timed out"
        ),
    }
    Ok(())
}

fn log_config(config: &BotConfig) {
    tracing::info!(
        port = config.server.port,
        youtube = config.youtube.api_key.is_some(),
        gemini_model = %config.gemini.model,
        naver = config.naver.client_id.is_some(),
        cron_secret = config.cron_secret.is_some(),
        max_results = config.youtube.max_results,
        hours_back = config.youtube.hours_back,
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
