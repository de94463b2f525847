//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// TTL + LRU response cache.
pub mod cache;

/// Configuration and dependency injection.
pub mod config;

/// Axum HTTP API and server.
pub mod http;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Cached passthrough fetcher for arbitrary URLs.
pub mod passthrough;

/// Tracing subscriber and OpenTelemetry integration.
pub mod telemetry;

/// Upstream quote API adapter (session, payload, fetch loop).
pub mod upstream;
