//! HTTP Controller (Driver Adapter)
//!
//! Axum router exposing the quote lookup, passthrough proxy, health and
//! metrics endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{MatchedPath, Query, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use super::response::{ApiError, HealthResponse};
use crate::application::services::QuoteService;
use crate::domain::quote::ScoredQuote;
use crate::infrastructure::metrics::{self, get_metrics_handle};
use crate::infrastructure::passthrough::{PassthroughBody, PassthroughFetcher};

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Cache-first quote lookup.
    pub quotes: Arc<QuoteService>,
    /// Passthrough URL fetcher.
    pub passthrough: Arc<PassthroughFetcher>,
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/quote", get(get_quote))
        .route("/api/health", get(health_check))
        .route("/api/proxy", get(proxy))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(request_context))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct QuoteQuery {
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProxyQuery {
    url: Option<String>,
}

/// Quote lookup endpoint.
async fn get_quote(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<ScoredQuote>, ApiError> {
    let quote = state.quotes.get_quote(query.symbol.as_deref()).await;
    if let Err(e) = &quote {
        tracing::info!(error = %e, "Quote lookup failed");
    }
    Ok(Json(quote?))
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Passthrough proxy endpoint.
async fn proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let body = state.passthrough.fetch(query.url.as_deref()).await?;
    Ok(match body {
        PassthroughBody::Json(value) => Json(value).into_response(),
        PassthroughBody::Text(text) => text.into_response(),
    })
}

/// Prometheus metrics endpoint.
async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

/// Run each request in a span carrying a fresh request id, and record its latency.
async fn request_context(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        route = %route,
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let elapsed = started.elapsed();

    let status = response.status().as_u16();
    metrics::record_request_duration(&route, status, elapsed);
    span.in_scope(|| {
        tracing::debug!(status, elapsed_ms = elapsed.as_millis(), "Request completed");
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
