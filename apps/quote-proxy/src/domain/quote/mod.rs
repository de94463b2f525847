//! Quote Types
//!
//! Canonical quote records produced from upstream payloads, and the ticker
//! symbol newtype used to key lookups.
//!
//! # Design
//!
//! - `Symbol` is always uppercase and restricted to characters that appear in
//!   real tickers (`BRK.B`, `^GSPC`, `EURUSD=X`, `BTC-USD`).
//! - `Quote` requires a price; the earnings ratios are optional.
//! - `ScoredQuote` is the immutable unit stored in the cache and returned to
//!   HTTP callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::scoring::compute_score;

/// Maximum accepted ticker length.
pub const MAX_SYMBOL_LEN: usize = 16;

// =============================================================================
// Symbol
// =============================================================================

/// Errors produced when validating a ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// Symbol was empty or whitespace only.
    #[error("symbol is empty")]
    Empty,

    /// Symbol exceeds the maximum length.
    #[error("symbol exceeds {MAX_SYMBOL_LEN} characters")]
    TooLong,

    /// Symbol contains a character that never appears in a ticker.
    #[error("symbol contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Uppercase, validated ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Parse a raw ticker, trimming whitespace and uppercasing.
    ///
    /// # Errors
    ///
    /// Returns `SymbolError` if the ticker is empty, too long, or contains
    /// characters outside `[A-Z0-9.^=-]`.
    pub fn parse(raw: &str) -> Result<Self, SymbolError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SymbolError::Empty);
        }
        if trimmed.chars().count() > MAX_SYMBOL_LEN {
            return Err(SymbolError::TooLong);
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-')))
        {
            return Err(SymbolError::InvalidCharacter(bad));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cache key for quote lookups: `"quote:" + SYMBOL`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("quote:{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Quote
// =============================================================================

/// Normalized quote for a single ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Canonical uppercase symbol.
    pub symbol: String,
    /// Last regular-market price.
    pub price: f64,
    /// Trailing twelve-month price/earnings ratio.
    pub trailing_pe: Option<f64>,
    /// Forward price/earnings ratio.
    pub forward_pe: Option<f64>,
}

impl Quote {
    /// Create a new quote, uppercasing the symbol.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        trailing_pe: Option<f64>,
        forward_pe: Option<f64>,
    ) -> Self {
        Self {
            symbol: symbol.into().to_ascii_uppercase(),
            price,
            trailing_pe,
            forward_pe,
        }
    }
}

/// Quote plus its composite score.
///
/// Serializes as `{symbol, price, pe, forwardPE, score}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredQuote {
    symbol: String,
    price: f64,
    #[serde(rename = "pe")]
    trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<f64>,
    score: u8,
}

impl ScoredQuote {
    /// Score a normalized quote.
    #[must_use]
    pub fn from_quote(quote: Quote) -> Self {
        let score = compute_score(quote.trailing_pe, quote.forward_pe);
        Self {
            symbol: quote.symbol,
            price: quote.price,
            trailing_pe: quote.trailing_pe,
            forward_pe: quote.forward_pe,
            score,
        }
    }

    /// Canonical symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Last price.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Trailing P/E, if reported.
    #[must_use]
    pub const fn trailing_pe(&self) -> Option<f64> {
        self.trailing_pe
    }

    /// Forward P/E, if reported.
    #[must_use]
    pub const fn forward_pe(&self) -> Option<f64> {
        self.forward_pe
    }

    /// Composite score in `[0, 100]`.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.score
    }
}

impl From<Quote> for ScoredQuote {
    fn from(quote: Quote) -> Self {
        Self::from_quote(quote)
    }
}
