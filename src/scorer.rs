//! Domain scoring
//!
//! Combines the monthly aggregator and the recency-weighted reducer into a
//! single scalar per domain: every field's monthly-mean series is reduced,
//! then the per-field scalars are summed.

use crate::bucket::MonthlyAggregator;
use crate::error::ScoreError;
use crate::reducer::exponential_weighted_average;
use crate::types::{DomainMetrics, MetricRecord};

/// Compute the subject user's recency-weighted score for one domain
///
/// Propagates [`ScoreError::InsufficientData`] when the user has no records
/// for the domain.
pub fn weighted_domain_score<M: DomainMetrics>(
    aggregator: &MonthlyAggregator,
    records: &[MetricRecord<M>],
    base: u32,
) -> Result<f64, ScoreError> {
    let series = aggregator.field_series(records)?;

    let mut score = 0.0;
    for field in &series {
        score += exponential_weighted_average(&field.means, base)?;
    }
    Ok(score)
}
