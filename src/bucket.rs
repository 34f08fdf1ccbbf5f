//! Monthly aggregation
//!
//! Groups one user's raw records for one domain into calendar-month buckets
//! and produces one mean value per metric field per month. Buckets are built
//! fresh on every query and never persisted.
//!
//! The bucket key is month-of-year (1-12), not year-month: records from
//! different years that share a month number collapse into the same bucket.
//! That policy lives in a single key-extraction function so it can be
//! swapped without touching the reducer.

use crate::error::ScoreError;
use crate::types::{DomainMetrics, MetricRecord};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Bucket key extracted from a record date
pub type MonthKey = u32;

/// Default bucket key: calendar month number (1-12), year discarded
pub fn month_of_year(date: NaiveDate) -> MonthKey {
    date.month()
}

/// One metric field's sequence of per-month means, ascending by bucket key
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub name: &'static str,
    pub means: Vec<f64>,
}

/// Aggregator producing per-field monthly mean series
#[derive(Debug, Clone, Copy)]
pub struct MonthlyAggregator {
    key_fn: fn(NaiveDate) -> MonthKey,
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new(month_of_year)
    }
}

impl MonthlyAggregator {
    /// Create an aggregator with a specific bucket key policy
    pub fn new(key_fn: fn(NaiveDate) -> MonthKey) -> Self {
        Self { key_fn }
    }

    /// Bucket records by month and compute per-field means
    ///
    /// Output series are ordered by ascending bucket key, one entry per
    /// field in the domain's schema. Fails with
    /// [`ScoreError::InsufficientData`] when the user has no records at all
    /// for the domain.
    pub fn field_series<M: DomainMetrics>(
        &self,
        records: &[MetricRecord<M>],
    ) -> Result<Vec<MetricSeries>, ScoreError> {
        if records.is_empty() {
            return Err(ScoreError::InsufficientData(format!(
                "No {} data found for this user",
                M::DOMAIN
            )));
        }

        // Per-bucket running sums for every field, plus the record count
        let mut buckets: BTreeMap<MonthKey, (Vec<f64>, usize)> = BTreeMap::new();
        for record in records {
            let key = (self.key_fn)(record.date);
            let (sums, count) = buckets
                .entry(key)
                .or_insert_with(|| (vec![0.0; M::FIELDS.len()], 0));
            for (sum, field) in sums.iter_mut().zip(M::FIELDS) {
                *sum += (field.get)(&record.metrics);
            }
            *count += 1;
        }

        Ok(M::FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| MetricSeries {
                name: field.name,
                means: buckets
                    .values()
                    .map(|(sums, count)| sums[i] / *count as f64)
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhysicalMetrics;
    use pretty_assertions::assert_eq;

    fn record(date: &str, steps: f64) -> MetricRecord<PhysicalMetrics> {
        MetricRecord::new(
            "alice",
            date.parse().unwrap(),
            PhysicalMetrics {
                steps,
                cardio_session_minutes: 10.0,
                strength_session_minutes: 5.0,
            },
        )
    }

    #[test]
    fn test_empty_input_is_insufficient_data() {
        let aggregator = MonthlyAggregator::default();
        let err = aggregator
            .field_series::<PhysicalMetrics>(&[])
            .unwrap_err();
        assert_eq!(err.to_string(), "No physical data found for this user");
    }

    #[test]
    fn test_means_within_one_month() {
        let aggregator = MonthlyAggregator::default();
        let records = vec![
            record("2023-10-01", 1000.0),
            record("2023-10-15", 3000.0),
        ];
        let series = aggregator.field_series(&records).unwrap();
        assert_eq!(series[0].name, "steps");
        assert_eq!(series[0].means, vec![2000.0]);
        assert_eq!(series[1].means, vec![10.0]);
    }

    #[test]
    fn test_series_ordered_by_month_number() {
        let aggregator = MonthlyAggregator::default();
        // November observed before the following January; the series is
        // keyed by month number, so January comes first.
        let records = vec![
            record("2023-11-05", 4000.0),
            record("2024-01-05", 1000.0),
        ];
        let series = aggregator.field_series(&records).unwrap();
        assert_eq!(series[0].means, vec![1000.0, 4000.0]);
    }

    #[test]
    fn test_same_month_across_years_shares_a_bucket() {
        let aggregator = MonthlyAggregator::default();
        let records = vec![
            record("2022-10-01", 1000.0),
            record("2023-10-01", 3000.0),
        ];
        let series = aggregator.field_series(&records).unwrap();
        assert_eq!(series[0].means, vec![2000.0]);
    }
}
