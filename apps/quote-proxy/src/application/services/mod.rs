//! Application Services
//!
//! Use cases orchestrating domain logic through the ports.

mod quote_service;

pub use quote_service::{QuoteError, QuoteService};
