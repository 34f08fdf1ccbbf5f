//! Engine orchestration
//!
//! This module provides the public scoring API. A score request walks the
//! full pipeline: age bracket resolution → three weighted domain scores for
//! the subject user → three cohort score sequences → final composition.
//!
//! The engine is stateless between invocations and strictly read-only: it
//! fetches from the [`RecordStore`], reduces, and returns. A caller-imposed
//! deadline simply abandons the computation; no partial result is ever
//! surfaced.

use crate::brackets::{resolve_age_bracket, AgeBracket};
use crate::bucket::MonthlyAggregator;
use crate::cohort::per_user_scores;
use crate::composer::{compose_final_score, CohortScores};
use crate::error::ScoreError;
use crate::reducer::DEFAULT_WEIGHT_BASE;
use crate::scorer::weighted_domain_score;
use crate::store::RecordStore;
use crate::types::DomainScores;
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Compute a user's health score with default settings
///
/// Convenience wrapper over [`ScoreEngine::compute_health_score`].
pub fn compute_health_score<S: RecordStore>(
    store: &S,
    user_id: &str,
) -> Result<f64, ScoreError> {
    ScoreEngine::default().compute_health_score(store, user_id)
}

/// Identifies the engine build that produced a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Cohort context captured alongside a score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortSummary {
    /// Bracket the subject user resolved into
    pub bracket: AgeBracket,
    /// Bracket members with physical data
    pub physical_members: usize,
    /// Bracket members with sleep data
    pub sleep_members: usize,
    /// Bracket members with blood data
    pub blood_members: usize,
    /// The population aggregate the score was normalized against
    pub composite: f64,
}

/// Full score computation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScoreReport {
    pub producer: ReportProducer,
    pub user_id: String,
    pub age: i32,
    pub domain_scores: DomainScores,
    pub user_composite: f64,
    pub cohort: CohortSummary,
    pub health_score: f64,
    pub computed_at_utc: String,
}

/// Scoring engine with configurable aggregation policy
///
/// The default engine buckets by month-of-year and weights with base 2.
pub struct ScoreEngine {
    aggregator: MonthlyAggregator,
    weight_base: u32,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self {
            aggregator: MonthlyAggregator::default(),
            weight_base: DEFAULT_WEIGHT_BASE,
        }
    }
}

impl ScoreEngine {
    /// Create an engine with a specific recency weight base
    pub fn with_weight_base(weight_base: u32) -> Self {
        Self {
            aggregator: MonthlyAggregator::default(),
            weight_base,
        }
    }

    /// Create an engine with explicit aggregation and weighting policies
    pub fn new(aggregator: MonthlyAggregator, weight_base: u32) -> Self {
        Self {
            aggregator,
            weight_base,
        }
    }

    /// Compute the final normalized health score for one user
    ///
    /// Fails with [`ScoreError::UserNotFound`] for an unknown user,
    /// [`ScoreError::InvalidAge`] for a negative stored age,
    /// [`ScoreError::InsufficientData`] when any of the three domains has
    /// no records for the user (all-or-nothing, no partial scores), and
    /// [`ScoreError::DegenerateCohort`] when the population aggregate is
    /// zero.
    pub fn compute_health_score<S: RecordStore>(
        &self,
        store: &S,
        user_id: &str,
    ) -> Result<f64, ScoreError> {
        self.compute_health_report(store, user_id)
            .map(|report| report.health_score)
    }

    /// Compute the score plus its full breakdown
    pub fn compute_health_report<S: RecordStore>(
        &self,
        store: &S,
        user_id: &str,
    ) -> Result<HealthScoreReport, ScoreError> {
        // Stage 1: resolve the comparison population
        let age = store.user_age(user_id)?;
        let bracket = resolve_age_bracket(age)?;
        debug!(user_id, age, bracket = %bracket, "resolved age bracket");

        // Stage 2: recency-weighted domain scores for the subject user
        let domain_scores = DomainScores {
            physical: weighted_domain_score(
                &self.aggregator,
                &store.physical_records(user_id),
                self.weight_base,
            )?,
            sleep: weighted_domain_score(
                &self.aggregator,
                &store.sleep_records(user_id),
                self.weight_base,
            )?,
            blood: weighted_domain_score(
                &self.aggregator,
                &store.blood_records(user_id),
                self.weight_base,
            )?,
        };
        debug!(
            physical = domain_scores.physical,
            sleep = domain_scores.sleep,
            blood = domain_scores.blood,
            "computed weighted domain scores"
        );

        // Stage 3: unweighted per-member scores for the whole bracket,
        // subject user included
        let cohort_scores = CohortScores {
            physical: per_user_scores(&store.cohort_physical_records(bracket)),
            sleep: per_user_scores(&store.cohort_sleep_records(bracket)),
            blood: per_user_scores(&store.cohort_blood_records(bracket)),
        };

        // Stage 4: compose and normalize
        let health_score = compose_final_score(&domain_scores, &cohort_scores)?;
        debug!(user_id, health_score, "composed final score");

        Ok(HealthScoreReport {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: Uuid::new_v4().to_string(),
            },
            user_id: user_id.to_string(),
            age,
            domain_scores,
            user_composite: domain_scores.composite(),
            cohort: CohortSummary {
                bracket,
                physical_members: cohort_scores.physical.len(),
                sleep_members: cohort_scores.sleep.len(),
                blood_members: cohort_scores.blood.len(),
                composite: cohort_scores.composite(),
            },
            health_score,
            computed_at_utc: Utc::now().to_rfc3339(),
        })
    }
}
