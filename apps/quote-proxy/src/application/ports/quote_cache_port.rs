//! Quote Cache Port (Driven Port)
//!
//! Interface for the shared, process-lifetime store of scored quotes.

use crate::domain::quote::ScoredQuote;

/// Store of scored quotes keyed by `"quote:" + SYMBOL`.
///
/// Implementations handle expiry and eviction; an expired entry reads as
/// absent. A `get` followed by a `set` is not atomic.
#[cfg_attr(test, mockall::automock)]
pub trait QuoteCache: Send + Sync {
    /// Look up a live entry.
    fn get(&self, key: &str) -> Option<ScoredQuote>;

    /// Insert or refresh an entry.
    fn set(&self, key: String, quote: ScoredQuote);
}
