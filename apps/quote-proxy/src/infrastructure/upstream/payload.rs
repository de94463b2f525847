//! Quote Payload Decoding
//!
//! Typed wire structs for the upstream quote response and the normalizer that
//! turns a raw record into a canonical [`Quote`].
//!
//! Numeric fields arrive in several shapes: a plain number, a `{"raw": n}`
//! wrapper, a formatted string, or nothing at all. Every field is decoded as a
//! loose JSON value first and classified afterwards, so one odd field never
//! fails the whole document.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::quote::{Quote, Symbol};

/// Top-level upstream response.
#[derive(Debug, Deserialize)]
pub struct QuoteEnvelope {
    /// Response body proper.
    #[serde(rename = "quoteResponse")]
    pub quote_response: QuoteResponse,
}

/// Result list of a quote response.
#[derive(Debug, Deserialize)]
pub struct QuoteResponse {
    /// Matching records; `null` and missing both mean no match.
    #[serde(default)]
    pub result: Option<Vec<RawQuoteRecord>>,
}

/// One upstream quote record with loosely typed fields.
#[derive(Debug, Default, Deserialize)]
pub struct RawQuoteRecord {
    /// Ticker as reported upstream.
    #[serde(default)]
    pub symbol: Option<Value>,
    /// Last regular-market price.
    #[serde(default, rename = "regularMarketPrice")]
    pub regular_market_price: Option<Value>,
    /// Trailing price/earnings ratio.
    #[serde(default, rename = "trailingPE")]
    pub trailing_pe: Option<Value>,
    /// Forward price/earnings ratio.
    #[serde(default, rename = "forwardPE")]
    pub forward_pe: Option<Value>,
}

/// Classification of a loosely typed numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Missing or `null`.
    Absent,
    /// Finite number, unwrapped from `{"raw": n}` if needed.
    Number(f64),
    /// Present but not a usable number.
    Malformed,
}

impl FieldValue {
    /// Classify an optional JSON value.
    #[must_use]
    pub fn classify(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map_or(Self::Malformed, Self::Number),
            Some(Value::Object(map)) => match map.get("raw") {
                Some(raw @ Value::Number(_)) => Self::classify(Some(raw)),
                _ => Self::Malformed,
            },
            Some(_) => Self::Malformed,
        }
    }

    /// The numeric value, treating malformed as absent.
    #[must_use]
    pub const fn number(self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(v),
            Self::Absent | Self::Malformed => None,
        }
    }
}

/// Normalization failure for a single record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The body was not a quote response document.
    #[error("undecodable quote response: {0}")]
    Undecodable(String),

    /// The record carries no numeric price.
    #[error("quote record for {0} has no numeric price")]
    MissingPrice(String),
}

/// Turn a raw record into a canonical quote.
///
/// The record's own symbol wins over `requested` when it is a string.
///
/// # Errors
///
/// Returns `NormalizeError::MissingPrice` if the price is absent or non-numeric.
pub fn normalize(record: &RawQuoteRecord, requested: &Symbol) -> Result<Quote, NormalizeError> {
    let symbol = record
        .symbol
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| requested.as_str());

    let price = match FieldValue::classify(record.regular_market_price.as_ref()) {
        FieldValue::Number(price) => price,
        FieldValue::Absent | FieldValue::Malformed => {
            return Err(NormalizeError::MissingPrice(symbol.to_ascii_uppercase()));
        }
    };

    let trailing_pe = ratio(record.trailing_pe.as_ref(), "trailingPE", symbol);
    let forward_pe = ratio(record.forward_pe.as_ref(), "forwardPE", symbol);

    Ok(Quote::new(symbol, price, trailing_pe, forward_pe))
}

/// Decode a 200 response body and normalize its first record.
///
/// Returns `Ok(None)` when the response holds no records.
///
/// # Errors
///
/// Returns `NormalizeError` if the body does not decode or the first record
/// has no numeric price.
pub fn decode_quote(body: &[u8], requested: &Symbol) -> Result<Option<Quote>, NormalizeError> {
    let envelope: QuoteEnvelope =
        serde_json::from_slice(body).map_err(|e| NormalizeError::Undecodable(e.to_string()))?;

    envelope
        .quote_response
        .result
        .unwrap_or_default()
        .first()
        .map(|record| normalize(record, requested))
        .transpose()
}

fn ratio(value: Option<&Value>, field: &'static str, symbol: &str) -> Option<f64> {
    match FieldValue::classify(value) {
        FieldValue::Malformed => {
            tracing::debug!(symbol, field, "Non-numeric ratio treated as absent");
            None
        }
        classified => classified.number(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn aapl() -> Symbol {
        Symbol::parse("AAPL").unwrap()
    }

    fn record(value: &Value) -> RawQuoteRecord {
        serde_json::from_value(value.clone()).unwrap()
    }

    #[test_case(None, FieldValue::Absent ; "missing")]
    #[test_case(Some(json!(null)), FieldValue::Absent ; "null")]
    #[test_case(Some(json!(25.5)), FieldValue::Number(25.5) ; "number")]
    #[test_case(Some(json!(12)), FieldValue::Number(12.0) ; "integer")]
    #[test_case(Some(json!({"raw": 18.2, "fmt": "18.20"})), FieldValue::Number(18.2) ; "raw wrapper")]
    #[test_case(Some(json!({"fmt": "18.20"})), FieldValue::Malformed ; "wrapper without raw")]
    #[test_case(Some(json!({"raw": "18.2"})), FieldValue::Malformed ; "wrapper with string raw")]
    #[test_case(Some(json!("25.5")), FieldValue::Malformed ; "string")]
    #[test_case(Some(json!(true)), FieldValue::Malformed ; "boolean")]
    #[test_case(Some(json!([1.0])), FieldValue::Malformed ; "array")]
    fn classify_field(value: Option<Value>, expected: FieldValue) {
        assert_eq!(FieldValue::classify(value.as_ref()), expected);
    }

    #[test]
    fn normalize_full_record() {
        let raw = record(&json!({
            "symbol": "aapl",
            "regularMarketPrice": 150.0,
            "trailingPE": 25.0,
            "forwardPE": {"raw": 20.0, "fmt": "20.00"}
        }));
        let quote = normalize(&raw, &aapl()).unwrap();
        assert_eq!(quote, Quote::new("AAPL", 150.0, Some(25.0), Some(20.0)));
    }

    #[test]
    fn normalize_treats_bad_ratios_as_absent() {
        let raw = record(&json!({
            "symbol": "XYZ",
            "regularMarketPrice": 3.0,
            "trailingPE": "Infinity",
            "forwardPE": false
        }));
        let quote = normalize(&raw, &aapl()).unwrap();
        assert_eq!(quote.trailing_pe, None);
        assert_eq!(quote.forward_pe, None);
    }

    #[test]
    fn normalize_falls_back_to_requested_symbol() {
        let raw = record(&json!({"regularMarketPrice": 1.0}));
        assert_eq!(normalize(&raw, &aapl()).unwrap().symbol, "AAPL");
    }

    #[test]
    fn normalize_requires_numeric_price() {
        let missing = record(&json!({"symbol": "AAPL"}));
        let string = record(&json!({"symbol": "AAPL", "regularMarketPrice": "150"}));
        assert_eq!(
            normalize(&missing, &aapl()),
            Err(NormalizeError::MissingPrice("AAPL".to_string()))
        );
        assert!(matches!(
            normalize(&string, &aapl()),
            Err(NormalizeError::MissingPrice(_))
        ));
    }

    #[test]
    fn decode_takes_first_record() {
        let body = json!({
            "quoteResponse": {
                "result": [
                    {"symbol": "AAPL", "regularMarketPrice": 150.0},
                    {"symbol": "MSFT", "regularMarketPrice": 400.0}
                ],
                "error": null
            }
        });
        let quote = decode_quote(body.to_string().as_bytes(), &aapl())
            .unwrap()
            .unwrap();
        assert_eq!(quote.symbol, "AAPL");
    }

    #[test_case(json!({"quoteResponse": {"result": []}}) ; "empty list")]
    #[test_case(json!({"quoteResponse": {"result": null}}) ; "null list")]
    #[test_case(json!({"quoteResponse": {}}) ; "missing list")]
    fn decode_without_records_is_none(body: Value) {
        assert_eq!(decode_quote(body.to_string().as_bytes(), &aapl()), Ok(None));
    }

    #[test_case(b"<html>Too Many Requests</html>" ; "html")]
    #[test_case(b"" ; "empty")]
    #[test_case(b"{\"finance\": {\"error\": {}}}" ; "wrong document")]
    fn decode_rejects_undecodable_body(body: &[u8]) {
        assert!(matches!(
            decode_quote(body, &aapl()),
            Err(NormalizeError::Undecodable(_))
        ));
    }
}
