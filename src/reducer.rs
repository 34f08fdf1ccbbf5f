//! Recency-weighted reduction
//!
//! Collapses an ordered sequence of monthly means into a single scalar with
//! exponentially increasing positional weights, so later-indexed buckets
//! dominate the result.

use crate::error::ScoreError;

/// Default exponential weight base
pub const DEFAULT_WEIGHT_BASE: u32 = 2;

/// Reduce a series to its exponentially weighted average
///
/// Computes `sum(value[i] * base^i) / sum(base^i)` for `i = 0..N-1`. The
/// index is the position in the series, not the calendar month number. A
/// base of 1 degenerates to the unweighted mean. Weights are computed in
/// `f64`, which stays exact through any realistic series length instead of
/// overflowing a fixed-width integer.
///
/// Fails with [`ScoreError::InsufficientData`] on an empty series and
/// [`ScoreError::InvalidWeightBase`] when `base` is zero.
pub fn exponential_weighted_average(series: &[f64], base: u32) -> Result<f64, ScoreError> {
    if base < 1 {
        return Err(ScoreError::InvalidWeightBase(base));
    }
    if series.is_empty() {
        return Err(ScoreError::InsufficientData(
            "Cannot reduce an empty series".to_string(),
        ));
    }

    let base = f64::from(base);
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (i, value) in series.iter().enumerate() {
        let weight = base.powi(i as i32);
        weighted_sum += value * weight;
        weight_total += weight;
    }

    Ok(weighted_sum / weight_total)
}
