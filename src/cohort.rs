//! Cohort normalization
//!
//! Produces the population side of the score: one unweighted domain score
//! per bracket member, computed over all of that member's history. Unlike
//! the subject-user path there is no monthly bucketing and no recency
//! weighting, just one mean per field per user, summed into a scalar.

use crate::types::{DomainMetrics, MetricRecord};
use std::collections::BTreeMap;

/// Per-user unweighted domain scores for one cohort
///
/// Records are grouped by user, each field averaged over the user's entire
/// history, and the field means summed into one score per member. An empty
/// cohort yields an empty sequence; the composer guards the zero-aggregate
/// case downstream.
pub fn per_user_scores<M: DomainMetrics>(records: &[MetricRecord<M>]) -> Vec<f64> {
    // Per-user running sums for every field, plus the record count.
    // BTreeMap keeps member order deterministic.
    let mut by_user: BTreeMap<&str, (Vec<f64>, usize)> = BTreeMap::new();
    for record in records {
        let (sums, count) = by_user
            .entry(record.user_id.as_str())
            .or_insert_with(|| (vec![0.0; M::FIELDS.len()], 0));
        for (sum, field) in sums.iter_mut().zip(M::FIELDS) {
            *sum += (field.get)(&record.metrics);
        }
        *count += 1;
    }

    by_user
        .values()
        .map(|(sums, count)| sums.iter().map(|sum| sum / *count as f64).sum())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhysicalMetrics;
    use pretty_assertions::assert_eq;

    fn record(user: &str, date: &str, steps: f64) -> MetricRecord<PhysicalMetrics> {
        MetricRecord::new(
            user,
            date.parse().unwrap(),
            PhysicalMetrics {
                steps,
                cardio_session_minutes: 30.0,
                strength_session_minutes: 20.0,
            },
        )
    }

    #[test]
    fn test_empty_cohort_is_empty() {
        assert!(per_user_scores::<PhysicalMetrics>(&[]).is_empty());
    }

    #[test]
    fn test_one_score_per_member() {
        let records = vec![
            record("alice", "2023-10-01", 1000.0),
            record("bob", "2023-10-01", 5000.0),
        ];
        let scores = per_user_scores(&records);
        assert_eq!(scores, vec![1050.0, 5050.0]);
    }

    #[test]
    fn test_months_collapse_into_one_mean_per_field() {
        // Two records in different months; the cohort side takes one mean
        // per field across all history, not per month.
        let records = vec![
            record("alice", "2023-09-01", 1000.0),
            record("alice", "2023-10-01", 3000.0),
        ];
        let scores = per_user_scores(&records);
        assert_eq!(scores, vec![2000.0 + 30.0 + 20.0]);
    }
}
