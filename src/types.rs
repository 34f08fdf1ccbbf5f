//! Core types for the vitalscore engine
//!
//! This module defines the raw measurement records that flow into the engine
//! and the static per-domain field schemas the aggregation stages iterate.
//! The schema is a fixed table of named accessors per domain rather than any
//! form of runtime field discovery, so the aggregator and scorers stay
//! type-safe.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement domain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Physical,
    Sleep,
    Blood,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Physical => "physical",
            Domain::Sleep => "sleep",
            Domain::Blood => "blood",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accessor into one named numeric field of a domain's metrics
pub struct MetricField<M> {
    /// Field name, stable across dataset JSON and report output
    pub name: &'static str,
    /// Reads the field value out of a metrics struct
    pub get: fn(&M) -> f64,
}

/// A domain's metrics struct together with its fixed field schema
///
/// The `'static` bound lets the schema live in a `&'static` table.
pub trait DomainMetrics: Clone + 'static {
    const DOMAIN: Domain;

    /// The fixed, ordered field table for this domain
    const FIELDS: &'static [MetricField<Self>];
}

/// One day of physical activity for one user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalMetrics {
    /// Steps taken during the day
    pub steps: f64,
    /// Cardio training time (minutes)
    #[serde(default)]
    pub cardio_session_minutes: f64,
    /// Strength training time (minutes)
    #[serde(default)]
    pub strength_session_minutes: f64,
}

impl DomainMetrics for PhysicalMetrics {
    const DOMAIN: Domain = Domain::Physical;

    const FIELDS: &'static [MetricField<Self>] = &[
        MetricField {
            name: "steps",
            get: |m| m.steps,
        },
        MetricField {
            name: "cardio_session_minutes",
            get: |m| m.cardio_session_minutes,
        },
        MetricField {
            name: "strength_session_minutes",
            get: |m| m.strength_session_minutes,
        },
    ];
}

/// One night of sleep for one user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepMetrics {
    /// Total sleep duration (hours)
    pub sleep_hours: f64,
    /// Average heart rate during sleep (bpm)
    pub avg_heart_rate: f64,
    /// Average blood oxygen saturation during sleep (percentage)
    pub avg_oxygen_level: f64,
}

impl DomainMetrics for SleepMetrics {
    const DOMAIN: Domain = Domain::Sleep;

    const FIELDS: &'static [MetricField<Self>] = &[
        MetricField {
            name: "sleep_hours",
            get: |m| m.sleep_hours,
        },
        MetricField {
            name: "avg_heart_rate",
            get: |m| m.avg_heart_rate,
        },
        MetricField {
            name: "avg_oxygen_level",
            get: |m| m.avg_oxygen_level,
        },
    ];
}

/// One blood panel result for one user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodMetrics {
    /// Red blood cell count (million cells/mcL)
    pub rbc: f64,
    /// White blood cell count (thousand cells/mcL)
    pub wbc: f64,
    /// Blood glucose (mg/dL)
    pub glucose_level: f64,
    /// Total cholesterol (mg/dL)
    pub cholesterol_level: f64,
    /// Triglycerides (mg/dL)
    pub triglycerides_level: f64,
}

impl DomainMetrics for BloodMetrics {
    const DOMAIN: Domain = Domain::Blood;

    const FIELDS: &'static [MetricField<Self>] = &[
        MetricField {
            name: "rbc",
            get: |m| m.rbc,
        },
        MetricField {
            name: "wbc",
            get: |m| m.wbc,
        },
        MetricField {
            name: "glucose_level",
            get: |m| m.glucose_level,
        },
        MetricField {
            name: "cholesterol_level",
            get: |m| m.cholesterol_level,
        },
        MetricField {
            name: "triglycerides_level",
            get: |m| m.triglycerides_level,
        },
    ];
}

/// One measurement event for one user, one domain, one calendar date
///
/// At most one record exists per (user, domain, date); the Record Store
/// enforces that invariant, the engine consumes it as a given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord<M> {
    /// Owning user identifier
    pub user_id: String,
    /// Calendar date of the measurement
    pub date: NaiveDate,
    /// Domain-specific measurement values
    pub metrics: M,
}

impl<M> MetricRecord<M> {
    pub fn new(user_id: impl Into<String>, date: NaiveDate, metrics: M) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            metrics,
        }
    }
}

/// The subject user's recency-weighted score for each domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainScores {
    pub physical: f64,
    pub sleep: f64,
    pub blood: f64,
}

impl DomainScores {
    /// Equal-weight average of the three domain scores
    pub fn composite(&self) -> f64 {
        (self.physical + self.sleep + self.blood) / 3.0
    }
}
