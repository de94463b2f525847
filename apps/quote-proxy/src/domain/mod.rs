//! Domain Layer - Core quote types and scoring logic.
//!
//! This layer contains the canonical quote record, ticker validation and
//! the composite valuation score. Nothing here performs I/O.

/// Quote records and ticker symbols.
pub mod quote;

/// Composite valuation score.
pub mod scoring;
