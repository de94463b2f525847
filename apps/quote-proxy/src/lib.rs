#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Quote Proxy - Resilient Stock Quote Service
//!
//! An HTTP service that fetches a ticker's price and earnings ratios from an
//! upstream quote API with no stable contract, scores it, and serves it from
//! a shared in-memory cache.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Quote types and scoring, no I/O
//!   - `quote`: Symbol validation, `Quote`, `ScoredQuote`
//!   - `scoring`: Two-ratio composite score
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: `QuoteSource`, `QuoteCache`, upstream failure taxonomy
//!   - `services`: Cache-first quote lookup
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `upstream`: Session bootstrap, payload decoding, retry/failover loop
//!   - `cache`: TTL + LRU cache
//!   - `passthrough`: Cached single-shot URL fetcher
//!   - `http`: Axum router and server
//!   - `config`: Configuration and dependency injection
//!   - `metrics`, `telemetry`: Prometheus and tracing
//!
//! # Data Flow
//!
//! ```text
//! GET /api/quote ──► QuoteService ──► cache hit ──────────────────────────► 200
//!                         │
//!                         └─ miss ──► YahooQuoteSource ──► SessionManager
//!                                          │                 (cookie, crumb)
//!                                          ▼
//!                                    upstream host[i] ──► normalize ──► score ──► cache ──► 200
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Quote types and scoring with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::quote::{Quote, ScoredQuote, Symbol, SymbolError};
pub use domain::scoring::{NEUTRAL_SCORE, compute_score};

// Application
pub use application::ports::{FailureClass, QuoteCache, QuoteSource, UpstreamError};
pub use application::services::{QuoteError, QuoteService};

// Infrastructure config
pub use infrastructure::config::{
    CacheSettings, ConfigError, ProxyConfig, RetrySettings, ServerSettings, UpstreamSettings,
    build_state,
};

// HTTP API
pub use infrastructure::http::{AppState, HttpServer, ServerError, create_router};

// Upstream adapter
pub use infrastructure::upstream::{SessionError, SessionManager, YahooQuoteSource};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
