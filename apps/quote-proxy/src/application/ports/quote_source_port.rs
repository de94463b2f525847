//! Quote Source Port (Driven Port)
//!
//! Interface for fetching a single normalized quote from the upstream
//! financial-data service, plus the failure taxonomy callers map to HTTP.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::quote::{Quote, Symbol};

/// Outward-facing failure class of an upstream error.
///
/// Local recovery (session refresh, backoff, host failover) has already been
/// attempted by the time an error of either class reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Upstream refused the request itself (4xx other than 404).
    ClientRejected,
    /// Upstream faulted, throttled past the retry bound, or was unreachable.
    UpstreamUnavailable,
}

/// Irrecoverable upstream failure after all retries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// Upstream returned a 4xx other than 401/403/404/429.
    #[error("upstream rejected request with HTTP {status}")]
    ClientRejected {
        /// HTTP status returned by upstream.
        status: u16,
    },

    /// Credentials were still rejected after forced session refreshes.
    #[error("upstream rejected credentials with HTTP {status} after {attempts} attempts")]
    AuthRejected {
        /// Last HTTP status (401 or 403).
        status: u16,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Upstream kept answering 429 after the backoff bound.
    #[error("upstream rate limit persisted after {retries} retries")]
    RateLimited {
        /// Backoff retries performed.
        retries: u32,
    },

    /// Upstream answered 5xx on every host and after backoff.
    #[error("upstream server error HTTP {status}")]
    ServerError {
        /// Last HTTP status returned.
        status: u16,
    },

    /// Transport failure on every host.
    #[error("upstream unreachable: {0}")]
    Network(String),

    /// A single upstream call exceeded its deadline on every host.
    #[error("upstream call exceeded {0:?} deadline")]
    Timeout(Duration),

    /// Upstream answered 200 with a body that does not decode.
    #[error("malformed upstream payload: {0}")]
    MalformedPayload(String),

    /// Session bootstrap (cookie/crumb) failed with no usable session.
    #[error("upstream session unavailable: {0}")]
    Session(String),
}

impl UpstreamError {
    /// Failure class preserved for the HTTP response.
    #[must_use]
    pub const fn class(&self) -> FailureClass {
        match self {
            Self::ClientRejected { .. } | Self::AuthRejected { .. } => FailureClass::ClientRejected,
            Self::RateLimited { .. }
            | Self::ServerError { .. }
            | Self::Network(_)
            | Self::Timeout(_)
            | Self::MalformedPayload(_)
            | Self::Session(_) => FailureClass::UpstreamUnavailable,
        }
    }
}

/// Port for fetching quotes from the upstream data service.
///
/// `Ok(None)` means upstream has no such ticker; it is never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch and normalize a quote for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError` once retries and failover are exhausted.
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<Option<Quote>, UpstreamError>;
}
