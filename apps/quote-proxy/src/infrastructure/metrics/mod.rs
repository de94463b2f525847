//! Prometheus Metrics Module
//!
//! Exposes application metrics via Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Cache**: Quote and passthrough cache hits and misses
//! - **Upstream**: Fetch attempts by outcome, session refreshes by result
//! - **Latency**: HTTP request duration by route and status
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP server port.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// # Panics
///
/// Panics if another global recorder was installed first.
#[allow(clippy::expect_used)]
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "quote_proxy_cache_lookups_total",
        "Cache lookups by cache and result"
    );

    describe_counter!(
        "quote_proxy_upstream_attempts_total",
        "Upstream quote attempts by outcome"
    );
    describe_counter!(
        "quote_proxy_session_refreshes_total",
        "Upstream session refreshes by result"
    );

    describe_histogram!(
        "quote_proxy_request_duration_seconds",
        "HTTP request duration by route and status"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Which cache a lookup hit.
#[derive(Debug, Clone, Copy)]
pub enum CacheKind {
    /// Scored quote cache.
    Quote,
    /// Passthrough response cache.
    Passthrough,
}

impl CacheKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Passthrough => "passthrough",
        }
    }
}

/// Cache lookup result.
#[derive(Debug, Clone, Copy)]
pub enum CacheResult {
    /// Live entry found.
    Hit,
    /// No live entry.
    Miss,
}

impl CacheResult {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
        }
    }
}

/// Outcome of a single upstream quote attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 2xx response.
    Success,
    /// 404 response.
    NotFound,
    /// 401 or 403 response.
    AuthRejected,
    /// 429 response.
    RateLimited,
    /// 5xx response.
    ServerError,
    /// Any other 4xx response.
    ClientError,
    /// Transport failure or timeout.
    Transport,
}

impl AttemptOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::AuthRejected => "auth_rejected",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::ClientError => "client_error",
            Self::Transport => "transport",
        }
    }
}

/// Session refresh result.
#[derive(Debug, Clone, Copy)]
pub enum RefreshResult {
    /// Fresh session stored.
    Refreshed,
    /// Refresh failed; previous session reused.
    Stale,
    /// Refresh failed with no usable session.
    Failed,
}

impl RefreshResult {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Refreshed => "refreshed",
            Self::Stale => "stale",
            Self::Failed => "failed",
        }
    }
}

/// Record a cache lookup.
pub fn record_cache_lookup(cache: CacheKind, result: CacheResult) {
    counter!(
        "quote_proxy_cache_lookups_total",
        "cache" => cache.as_str(),
        "result" => result.as_str()
    )
    .increment(1);
}

/// Record an upstream quote attempt.
pub fn record_upstream_attempt(outcome: AttemptOutcome) {
    counter!(
        "quote_proxy_upstream_attempts_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a session refresh.
pub fn record_session_refresh(result: RefreshResult) {
    counter!(
        "quote_proxy_session_refreshes_total",
        "result" => result.as_str()
    )
    .increment(1);
}

/// Record HTTP request duration.
pub fn record_request_duration(route: &str, status: u16, duration: Duration) {
    histogram!(
        "quote_proxy_request_duration_seconds",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================
