//! HTTP Response Types
//!
//! JSON bodies and the single mapping from service errors to status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::application::ports::FailureClass;
use crate::application::services::QuoteError;
use crate::infrastructure::passthrough::ProxyError;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short human-readable message.
    pub error: String,
}

/// An HTTP-facing error: a status code and a short message.
///
/// Retry counts and hosts stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::MissingSymbol => {
                Self::new(StatusCode::BAD_REQUEST, "Missing symbol query parameter")
            }
            QuoteError::InvalidSymbol(e) => {
                Self::new(StatusCode::BAD_REQUEST, format!("Invalid symbol: {e}"))
            }
            QuoteError::NotFound => Self::new(StatusCode::NOT_FOUND, "Ticker not found"),
            QuoteError::Upstream(e) => match e.class() {
                FailureClass::ClientRejected => {
                    Self::new(StatusCode::BAD_REQUEST, "Upstream rejected the request")
                }
                FailureClass::UpstreamUnavailable => {
                    Self::new(StatusCode::BAD_GATEWAY, "Failed to fetch quote from upstream")
                }
            },
        }
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::MissingUrl => {
                Self::new(StatusCode::BAD_REQUEST, "Missing url query parameter")
            }
            ProxyError::InvalidUrl(_) | ProxyError::UnsupportedScheme(_) => {
                Self::new(StatusCode::BAD_REQUEST, "Only http and https URLs can be proxied")
            }
            ProxyError::UpstreamStatus { status } => Self::new(
                StatusCode::BAD_GATEWAY,
                format!("Upstream responded with HTTP {status}"),
            ),
            ProxyError::Network(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "Failed to fetch upstream URL")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
