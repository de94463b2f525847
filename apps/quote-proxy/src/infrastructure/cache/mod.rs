//! Response Cache
//!
//! Generic TTL-bounded least-recently-used cache shared by all in-flight
//! requests. Values are cloned out on read.
//!
//! # Semantics
//!
//! - Every entry gets the same TTL at insertion; there is no per-key override.
//! - Expired entries read as absent and are evicted lazily on access.
//! - Inserting past capacity evicts the least-recently-used entry, whether or
//!   not it has expired.
//! - Individual operations are atomic; a `get` followed by a `set` is not.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use super::config::CacheSettings;
use crate::application::ports::QuoteCache;
use crate::domain::quote::ScoredQuote;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// TTL + LRU cache keyed by string.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<LruCache<String, Entry<V>>>,
    ttl: Duration,
}

/// Shared cache handle.
pub type SharedCache<V> = Arc<TtlCache<V>>;

impl<V: Clone> TtlCache<V> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Create a cache from settings.
    #[must_use]
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.capacity, settings.ttl)
    }

    /// Get a live value, marking it most-recently-used.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Insert or refresh a value with the cache TTL, marking it most-recently-used.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key.into(), value, Instant::now());
    }

    /// Check whether a live value exists without changing recency.
    pub fn has(&self, key: &str) -> bool {
        self.has_at(key, Instant::now())
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Uniform time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.peek(key) {
            Some(entry) if entry.is_live(now) => entries.get(key).map(|e| e.value.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    fn set_at(&self, key: String, value: V, now: Instant) {
        let entry = Entry {
            value,
            expires_at: now + self.ttl,
        };
        self.entries.lock().put(key, entry);
    }

    fn has_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = self.entries.lock();
        match entries.peek(key) {
            Some(entry) if entry.is_live(now) => true,
            Some(_) => {
                entries.pop(key);
                false
            }
            None => false,
        }
    }
}

impl QuoteCache for TtlCache<ScoredQuote> {
    fn get(&self, key: &str) -> Option<ScoredQuote> {
        Self::get(self, key)
    }

    fn set(&self, key: String, quote: ScoredQuote) {
        Self::set(self, key, quote);
    }
}
