//! Port Interfaces
//!
//! Defines the interfaces (ports) for external systems following
//! the Hexagonal Architecture pattern. These are the contracts that
//! infrastructure adapters must implement.
//!
//! ## Driven Ports (Outbound)
//!
//! - `QuoteSource`: Fetches a normalized quote from the upstream data service
//! - `QuoteCache`: Shared TTL store of scored quotes

mod quote_cache_port;
mod quote_source_port;

pub use quote_cache_port::QuoteCache;
pub use quote_source_port::{FailureClass, QuoteSource, UpstreamError};

#[cfg(test)]
pub use quote_cache_port::MockQuoteCache;
#[cfg(test)]
pub use quote_source_port::MockQuoteSource;
