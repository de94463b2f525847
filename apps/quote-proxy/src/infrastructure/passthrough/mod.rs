//! Passthrough Fetcher
//!
//! Fetches an arbitrary http(s) URL once, caches the body by the URL string,
//! and hands it back verbatim. No retries, no session handling.

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::infrastructure::cache::SharedCache;
use crate::infrastructure::metrics::{self, CacheKind, CacheResult};

/// Body returned by a passthrough fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum PassthroughBody {
    /// Body parsed as JSON.
    Json(Value),
    /// Anything else, as text.
    Text(String),
}

impl PassthroughBody {
    fn from_text(text: String) -> Self {
        serde_json::from_str(&text).map_or(Self::Text(text), Self::Json)
    }
}

/// Passthrough fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// No `url` parameter was supplied.
    #[error("missing url query parameter")]
    MissingUrl,

    /// The URL does not parse.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The URL scheme is not http or https.
    #[error("unsupported url scheme {0:?}")]
    UnsupportedScheme(String),

    /// The target answered with a non-success status.
    #[error("upstream responded with HTTP {status}")]
    UpstreamStatus {
        /// HTTP status returned by the target.
        status: u16,
    },

    /// The target could not be reached or its body could not be read.
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Cache-backed single-shot URL fetcher.
#[derive(Debug)]
pub struct PassthroughFetcher {
    client: Client,
    cache: SharedCache<PassthroughBody>,
}

impl PassthroughFetcher {
    /// Create a fetcher over a shared client and cache.
    #[must_use]
    pub const fn new(client: Client, cache: SharedCache<PassthroughBody>) -> Self {
        Self { client, cache }
    }

    /// Fetch `raw_url`, serving from the cache when a live entry exists.
    ///
    /// # Errors
    ///
    /// Returns `ProxyError` if the URL is missing, invalid or not http(s), or
    /// the target fails or answers with a non-success status.
    pub async fn fetch(&self, raw_url: Option<&str>) -> Result<PassthroughBody, ProxyError> {
        let raw_url = raw_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ProxyError::MissingUrl)?;

        let url = Url::parse(raw_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProxyError::UnsupportedScheme(url.scheme().to_string()));
        }

        if let Some(body) = self.cache.get(raw_url) {
            metrics::record_cache_lookup(CacheKind::Passthrough, CacheResult::Hit);
            return Ok(body);
        }
        metrics::record_cache_lookup(CacheKind::Passthrough, CacheResult::Miss);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = raw_url, status = status.as_u16(), "Passthrough target failed");
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = PassthroughBody::from_text(response.text().await?);
        self.cache.set(raw_url, body.clone());
        Ok(body)
    }
}
