//! Score composition
//!
//! Merges the subject user's weighted domain scores with the cohort's
//! per-member scores into the final normalized health score.

use crate::error::ScoreError;
use crate::types::DomainScores;
use serde::{Deserialize, Serialize};

/// Per-member unweighted domain scores for the subject's cohort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortScores {
    pub physical: Vec<f64>,
    pub sleep: Vec<f64>,
    pub blood: Vec<f64>,
}

impl CohortScores {
    /// The population aggregate the final score is normalized against
    ///
    /// This is the *sum* of all members' per-domain scores divided by
    /// three, not a mean over members, which makes the result sensitive to
    /// cohort size. That is the inherited scoring behavior and callers
    /// should not rely on it being population-size invariant.
    pub fn composite(&self) -> f64 {
        let physical: f64 = self.physical.iter().sum();
        let sleep: f64 = self.sleep.iter().sum();
        let blood: f64 = self.blood.iter().sum();
        (physical + sleep + blood) / 3.0
    }
}

/// Compose the final health score
///
/// `100 * user_composite / cohort_composite`, where the user composite is
/// the equal-weight mean of the three weighted domain scores. Fails with
/// [`ScoreError::DegenerateCohort`] when the cohort aggregate is zero
/// (empty cohort or all-zero readings) rather than producing `inf`/`NaN`.
pub fn compose_final_score(
    user: &DomainScores,
    cohort: &CohortScores,
) -> Result<f64, ScoreError> {
    let cohort_composite = cohort.composite();
    if cohort_composite == 0.0 {
        return Err(ScoreError::DegenerateCohort);
    }
    Ok(100.0 * user.composite() / cohort_composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cohort_composite_sums_members() {
        let cohort = CohortScores {
            physical: vec![1050.0, 5090.0],
            sleep: vec![166.0, 167.0],
            blood: vec![430.5, 462.5],
        };
        assert_eq!(cohort.composite(), (6140.0 + 333.0 + 893.0) / 3.0);
    }

    #[test]
    fn test_final_score_normalizes_against_cohort() {
        let user = DomainScores {
            physical: 1050.0,
            sleep: 166.0,
            blood: 430.5,
        };
        let cohort = CohortScores {
            physical: vec![1050.0, 5090.0],
            sleep: vec![166.0, 167.0],
            blood: vec![430.5, 462.5],
        };
        let score = compose_final_score(&user, &cohort).unwrap();
        let expected = 100.0 * (1646.5 / 3.0) / (7366.0 / 3.0);
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_cohort_is_degenerate() {
        let user = DomainScores {
            physical: 1.0,
            sleep: 1.0,
            blood: 1.0,
        };
        assert!(matches!(
            compose_final_score(&user, &CohortScores::default()),
            Err(ScoreError::DegenerateCohort)
        ));
    }

    #[test]
    fn test_all_zero_cohort_is_degenerate() {
        let user = DomainScores {
            physical: 1.0,
            sleep: 1.0,
            blood: 1.0,
        };
        let cohort = CohortScores {
            physical: vec![0.0],
            sleep: vec![0.0],
            blood: vec![0.0],
        };
        assert!(matches!(
            compose_final_score(&user, &cohort),
            Err(ScoreError::DegenerateCohort)
        ));
    }
}
