//! Vitalscore - score aggregation engine for daily personal-health metrics
//!
//! Vitalscore reduces three independent streams of daily measurements
//! (physical activity, sleep, blood panels) to a single comparable score
//! through a deterministic pipeline: monthly aggregation → recency-weighted
//! reduction → domain scoring → age-cohort normalization.
//!
//! The engine is pure computation: it queries a [`store::RecordStore`] for
//! raw records, holds no state between invocations, and never writes. The
//! scoring formula is a mechanism for combining the three domains with a
//! recency bias, not a medically meaningful metric.
//!
//! ## Modules
//!
//! - **bucket**: per-field monthly means (the Monthly Aggregator)
//! - **reducer**: exponential positional weighting (the Recency-Weighted Reducer)
//! - **scorer**: per-domain weighted scores
//! - **cohort**: per-member unweighted population scores
//! - **composer**: final composition and normalization
//! - **brackets**: fixed age-bracket resolution
//! - **store**: the Record Store seam and an in-memory implementation
//! - **engine**: orchestration and the score report payload

pub mod brackets;
pub mod bucket;
pub mod cohort;
pub mod composer;
pub mod engine;
pub mod error;
pub mod reducer;
pub mod scorer;
pub mod store;
pub mod types;

pub use brackets::{resolve_age_bracket, AgeBracket, AGE_BRACKETS};
pub use composer::CohortScores;
pub use engine::{compute_health_score, HealthScoreReport, ScoreEngine};
pub use error::ScoreError;
pub use store::{Dataset, MemoryRecordStore, RecordStore};
pub use types::{
    BloodMetrics, Domain, DomainScores, MetricRecord, PhysicalMetrics, SleepMetrics,
};

/// Engine version embedded in score reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for score reports
pub const PRODUCER_NAME: &str = "vitalscore";
