//! Dependency Wiring
//!
//! Builds the process-lifetime collaborators from configuration and hands
//! them to the HTTP layer.

use std::sync::Arc;

use super::{ConfigError, ProxyConfig};
use crate::application::ports::QuoteCache;
use crate::application::services::QuoteService;
use crate::domain::quote::ScoredQuote;
use crate::infrastructure::cache::{SharedCache, TtlCache};
use crate::infrastructure::http::AppState;
use crate::infrastructure::passthrough::PassthroughFetcher;
use crate::infrastructure::upstream::{self, SessionManager, YahooQuoteSource};

/// Build the shared application state.
///
/// One HTTP client backs the session manager, the quote source and the
/// passthrough fetcher. The quote and passthrough caches share capacity and TTL.
///
/// # Errors
///
/// Returns `ConfigError::HttpClient` if the upstream client cannot be built.
pub fn build_state(config: &ProxyConfig) -> Result<AppState, ConfigError> {
    let client = upstream::build_client(&config.upstream)
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

    let session = Arc::new(SessionManager::new(client.clone(), &config.upstream));
    let source = Arc::new(YahooQuoteSource::new(
        client.clone(),
        session,
        &config.upstream,
        config.retry.clone(),
    ));

    let quote_cache: Arc<dyn QuoteCache> =
        Arc::new(TtlCache::<ScoredQuote>::from_settings(&config.cache));
    let passthrough_cache: SharedCache<_> = Arc::new(TtlCache::from_settings(&config.cache));

    Ok(AppState {
        quotes: Arc::new(QuoteService::new(source, quote_cache)),
        passthrough: Arc::new(PassthroughFetcher::new(client, passthrough_cache)),
    })
}
