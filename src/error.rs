//! Error types for the vitalscore engine

use thiserror::Error;

/// Errors that can occur during score computation
///
/// Every variant is terminal for the score request: nothing is retried and
/// no partial score is ever returned. A thin HTTP layer would map
/// `UserNotFound` and `InsufficientData` to 404, `InvalidAge` to 422.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("User not found")]
    UserNotFound,

    #[error("Age cannot be negative: {0}")]
    InvalidAge(i32),

    #[error("{0}")]
    InsufficientData(String),

    #[error("Cohort aggregate is zero, score normalization is undefined")]
    DegenerateCohort,

    #[error("Weight base must be at least 1, got {0}")]
    InvalidWeightBase(u32),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
