//! Composite Valuation Score
//!
//! Maps the trailing and forward P/E ratios onto a `0..=100` score where a
//! cheaper earnings multiple scores higher.
//!
//! # Formula
//!
//! ```text
//! contributors = { 1/r : r in [trailing, forward], r finite and r > 0 }
//! score        = 50                                   if contributors is empty
//!              = round(clamp(mean(contributors) * 100, 0, 100))  otherwise
//! ```
//!
//! Zero, negative and missing ratios are excluded from the mean rather than
//! clamped. This is a deliberately small two-ratio composite.

/// Score returned when no ratio contributes.
pub const NEUTRAL_SCORE: u8 = 50;

/// Compute the composite score for a pair of P/E ratios.
#[must_use]
pub fn compute_score(trailing_pe: Option<f64>, forward_pe: Option<f64>) -> u8 {
    let reciprocals: Vec<f64> = [trailing_pe, forward_pe]
        .into_iter()
        .flatten()
        .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
        .map(f64::recip)
        .collect();

    if reciprocals.is_empty() {
        return NEUTRAL_SCORE;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = reciprocals.iter().sum::<f64>() / reciprocals.len() as f64;

    // Clamped to [0, 100] before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = (mean * 100.0).clamp(0.0, 100.0).round() as u8;
    score
}
