//! Quote Lookup Service
//!
//! Validates a ticker, serves it from the shared cache when possible, and
//! otherwise fetches, scores, and stores it.

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{QuoteCache, QuoteSource, UpstreamError};
use crate::domain::quote::{ScoredQuote, Symbol, SymbolError};
use crate::infrastructure::metrics::{self, CacheKind, CacheResult};

/// Errors surfaced by a quote lookup.
#[derive(Debug, Clone, Error)]
pub enum QuoteError {
    /// No symbol was supplied, or it was blank.
    #[error("missing symbol")]
    MissingSymbol,

    /// The symbol failed validation.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(#[source] SymbolError),

    /// Upstream has no such ticker.
    #[error("ticker not found")]
    NotFound,

    /// Upstream failed after local recovery.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Cache-first quote lookup.
pub struct QuoteService {
    source: Arc<dyn QuoteSource>,
    cache: Arc<dyn QuoteCache>,
}

impl QuoteService {
    /// Create a new service over a quote source and cache.
    #[must_use]
    pub fn new(source: Arc<dyn QuoteSource>, cache: Arc<dyn QuoteCache>) -> Self {
        Self { source, cache }
    }

    /// Look up a scored quote for a raw ticker.
    ///
    /// Not-found results and failures are never cached.
    ///
    /// # Errors
    ///
    /// Returns `QuoteError` if the ticker is missing or invalid, upstream has
    /// no such ticker, or upstream failed.
    pub async fn get_quote(&self, raw: Option<&str>) -> Result<ScoredQuote, QuoteError> {
        let symbol = match raw.map(Symbol::parse) {
            None | Some(Err(SymbolError::Empty)) => return Err(QuoteError::MissingSymbol),
            Some(Err(e)) => return Err(QuoteError::InvalidSymbol(e)),
            Some(Ok(symbol)) => symbol,
        };

        let key = symbol.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            metrics::record_cache_lookup(CacheKind::Quote, CacheResult::Hit);
            tracing::debug!(symbol = %symbol, "Quote served from cache");
            return Ok(cached);
        }
        metrics::record_cache_lookup(CacheKind::Quote, CacheResult::Miss);

        let quote = self
            .source
            .fetch_quote(&symbol)
            .await?
            .ok_or(QuoteError::NotFound)?;

        let scored = ScoredQuote::from_quote(quote);
        self.cache.set(key, scored.clone());

        tracing::info!(
            symbol = %symbol,
            price = scored.price(),
            score = scored.score(),
            "Quote fetched"
        );
        Ok(scored)
    }
}

impl std::fmt::Debug for QuoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteService").finish_non_exhaustive()
    }
}
