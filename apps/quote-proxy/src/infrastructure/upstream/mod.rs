//! Upstream Quote Service Adapter
//!
//! Implements [`QuoteSource`](crate::application::ports::QuoteSource) against
//! the Yahoo Finance quote API.
//!
//! # Components
//!
//! - `session`: cookie/crumb session bootstrap and renewal
//! - `payload`: wire structs and record normalization
//! - `fetch`: the retry / backoff / failover loop

pub mod fetch;
pub mod payload;
pub mod session;

pub use fetch::YahooQuoteSource;
pub use payload::{FieldValue, NormalizeError, decode_quote, normalize};
pub use session::{Session, SessionError, SessionManager};

use reqwest::Client;

use crate::infrastructure::config::UpstreamSettings;

/// Build the HTTP client shared by the session manager and quote fetches.
///
/// Every call made with it carries the configured user agent and deadline.
///
/// # Errors
///
/// Returns `reqwest::Error` if the TLS backend cannot be initialized.
pub fn build_client(settings: &UpstreamSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .build()
}
