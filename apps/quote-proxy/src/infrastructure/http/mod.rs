//! HTTP API
//!
//! # Endpoints
//!
//! - `GET /api/quote?symbol=<TICKER>` - Scored quote
//! - `GET /api/health` - Liveness (`{"status":"ok"}`)
//! - `GET /api/proxy?url=<URL>` - Cached passthrough fetch
//! - `GET /metrics` - Prometheus metrics in text format

mod controller;
mod response;
mod server;

pub use controller::{AppState, REQUEST_ID_HEADER, create_router};
pub use response::{ApiError, ErrorResponse, HealthResponse};
pub use server::{HttpServer, ServerError};
