//! Quote Proxy Binary
//!
//! Starts the quote proxy HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin quote-proxy
//! ```
//!
//! # Environment Variables
//!
//! - `QUOTE_PROXY_PORT`: HTTP port (default: 3001)
//! - `QUOTE_PROXY_UPSTREAM_HOSTS`: Comma-separated quote hosts, tried in order
//! - `QUOTE_PROXY_QUOTE_PATH`: Quote endpoint path (default: /v7/finance/quote)
//! - `QUOTE_PROXY_COOKIE_URL`: Session cookie landing URL
//! - `QUOTE_PROXY_CRUMB_URL`: Crumb endpoint URL
//! - `QUOTE_PROXY_USER_AGENT`: Upstream user agent
//! - `QUOTE_PROXY_UPSTREAM_TIMEOUT_SECS`: Per-call deadline (default: 10)
//! - `QUOTE_PROXY_SESSION_TTL_SECS`: Session lifetime (default: 1800)
//! - `QUOTE_PROXY_CACHE_CAPACITY`: Entries per cache (default: 100)
//! - `QUOTE_PROXY_CACHE_TTL_SECS`: Cache entry lifetime (default: 300)
//! - `QUOTE_PROXY_NETWORK_RETRY_LIMIT`: Transport failures per host (default: 2)
//! - `QUOTE_PROXY_AUTH_RETRY_LIMIT`: 401/403 attempts (default: 2)
//! - `QUOTE_PROXY_BACKOFF_RETRY_LIMIT`: 429/5xx backoff retries (default: 3)
//! - `QUOTE_PROXY_BACKOFF_BASE_MS`: Backoff unit (default: 1000)
//! - `OTEL_ENABLED`: Export spans over OTLP (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `RUST_LOG`: Log filter (default: quote_proxy=info)

use std::time::Duration;

use anyhow::Context;
use quote_proxy::infrastructure::telemetry;
use quote_proxy::{HttpServer, ProxyConfig, build_state, init_metrics};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting quote proxy");

    let _metrics_handle = init_metrics();

    let config = ProxyConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    let state = build_state(&config).context("failed to build application state")?;

    let shutdown_token = CancellationToken::new();
    let server = HttpServer::new(config.server.port, state, shutdown_token.clone());
    let mut server_task = tokio::spawn(server.run());

    tokio::select! {
        result = &mut server_task => {
            // The server only returns early on a fatal error.
            result.context("HTTP server task panicked")??;
            return Ok(());
        }
        () = await_shutdown(shutdown_token) => {}
    }

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server_task).await {
        Ok(result) => result.context("HTTP server task panicked")??,
        Err(_) => tracing::warn!("Graceful shutdown timed out"),
    }

    tracing::info!("Quote proxy stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Log the parsed configuration.
fn log_config(config: &ProxyConfig) {
    tracing::info!(
        port = config.server.port,
        hosts = ?config.upstream.hosts,
        cache_capacity = config.cache.capacity,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        "Configuration loaded"
    );
    tracing::debug!(
        quote_path = %config.upstream.quote_path,
        cookie_url = %config.upstream.cookie_url,
        crumb_url = %config.upstream.crumb_url,
        timeout_secs = config.upstream.timeout.as_secs(),
        session_ttl_secs = config.upstream.session_ttl.as_secs(),
        network_retry_limit = config.retry.network_retry_limit,
        auth_retry_limit = config.retry.auth_retry_limit,
        backoff_retry_limit = config.retry.backoff_retry_limit,
        backoff_base_ms = config.retry.backoff_base.as_millis(),
        "Upstream policy"
    );
}

/// Load .env file from any ancestor directory.
fn load_dotenv_from_ancestors() {
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
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
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

    shutdown_token.cancel();

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
