//! Age bracket resolution
//!
//! Maps a user's age to the fixed bracket used to select the comparison
//! population. The brackets are static configuration, never derived from
//! data, and membership is half-open: `start <= age < end`.

use crate::error::ScoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open age range `[start, end)` selecting a comparison population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub start: i32,
    pub end: i32,
}

impl AgeBracket {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Whether an age falls inside this bracket
    pub fn contains(&self, age: i32) -> bool {
        self.start <= age && age < self.end
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The fixed bracket table, in ascending-boundary order
pub const AGE_BRACKETS: [AgeBracket; 10] = [
    AgeBracket::new(0, 1),    // baby
    AgeBracket::new(1, 4),    // toddler
    AgeBracket::new(4, 13),   // child
    AgeBracket::new(13, 20),  // teen
    AgeBracket::new(20, 25),  // young adult
    AgeBracket::new(25, 36),
    AgeBracket::new(36, 50),
    AgeBracket::new(51, 66),
    AgeBracket::new(66, 76),
    AgeBracket::new(76, 120), // arbitrary upper limit for seniors
];

/// Resolve an age to its bracket
///
/// The mapping is a threshold chain, not a scan of the bracket bounds: the
/// table has seams (ages 46-50 resolve to [51,66)) and an unbounded final
/// arm (everything above 75, including ages past 120, resolves to the
/// senior bracket). Negative ages fail with [`ScoreError::InvalidAge`].
///
/// Resolution and membership are deliberately different rules, inherited
/// as-is: cohort membership uses [`AgeBracket::contains`], and at the seam
/// ages (1, 25, 46-50, 120 and up) the resolved bracket does not contain
/// the age that resolved into it. Such a user is compared against a
/// population they do not belong to — possibly an empty one, which
/// surfaces as `DegenerateCohort` — while counting toward whichever
/// adjacent bracket `contains` places them in (age 50 belongs to none).
pub fn resolve_age_bracket(age: i32) -> Result<AgeBracket, ScoreError> {
    if age < 0 {
        return Err(ScoreError::InvalidAge(age));
    }
    let bracket = match age {
        0..=1 => AGE_BRACKETS[0],
        2..=3 => AGE_BRACKETS[1],
        4..=12 => AGE_BRACKETS[2],
        13..=19 => AGE_BRACKETS[3],
        20..=25 => AGE_BRACKETS[4],
        26..=35 => AGE_BRACKETS[5],
        36..=45 => AGE_BRACKETS[6],
        46..=65 => AGE_BRACKETS[7],
        66..=75 => AGE_BRACKETS[8],
        _ => AGE_BRACKETS[9],
    };
    Ok(bracket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_negative_age_is_invalid() {
        assert!(matches!(
            resolve_age_bracket(-1),
            Err(ScoreError::InvalidAge(-1))
        ));
    }

    #[test]
    fn test_boundary_ages() {
        assert_eq!(resolve_age_bracket(0).unwrap(), AgeBracket::new(0, 1));
        assert_eq!(resolve_age_bracket(1).unwrap(), AgeBracket::new(0, 1));
        assert_eq!(resolve_age_bracket(13).unwrap(), AgeBracket::new(13, 20));
        assert_eq!(resolve_age_bracket(25).unwrap(), AgeBracket::new(20, 25));
        assert_eq!(resolve_age_bracket(120).unwrap(), AgeBracket::new(76, 120));
    }

    #[test]
    fn test_table_seam_resolves_to_upper_bracket() {
        // Ages 46-50 sit between the [36,50) and [51,66) bounds; the
        // threshold chain puts them in the upper bracket.
        assert_eq!(resolve_age_bracket(46).unwrap(), AgeBracket::new(51, 66));
        assert_eq!(resolve_age_bracket(50).unwrap(), AgeBracket::new(51, 66));
    }

    #[test]
    fn test_ages_past_the_table_clamp_to_seniors() {
        assert_eq!(resolve_age_bracket(130).unwrap(), AgeBracket::new(76, 120));
    }

    #[test]
    fn test_seam_ages_resolve_outside_their_own_bracket() {
        // Resolution (threshold chain) and membership (contains) split at
        // the seams: the resolved bracket does not contain the age.
        for age in [1, 25, 46, 50, 120] {
            let bracket = resolve_age_bracket(age).unwrap();
            assert!(
                !bracket.contains(age),
                "age {age} unexpectedly contained by {bracket}"
            );
        }
        // Off-seam ages land in a bracket that does contain them
        for age in [0, 24, 30, 45, 75] {
            let bracket = resolve_age_bracket(age).unwrap();
            assert!(bracket.contains(age), "age {age} not in {bracket}");
        }
    }

    #[test]
    fn test_seam_age_counts_toward_adjacent_bracket() {
        // Age 25 resolves to [20,25) but is a member of [25,36);
        // age 50 resolves to [51,66) and is a member of no bracket at all.
        assert_eq!(resolve_age_bracket(25).unwrap(), AgeBracket::new(20, 25));
        assert!(AgeBracket::new(25, 36).contains(25));
        assert!(!AGE_BRACKETS.iter().any(|b| b.contains(50)));
    }

    #[test]
    fn test_contains_is_half_open() {
        let bracket = AgeBracket::new(20, 25);
        assert!(bracket.contains(20));
        assert!(bracket.contains(24));
        assert!(!bracket.contains(25));
        assert!(!bracket.contains(19));
    }

    #[test]
    fn test_bracket_display() {
        assert_eq!(AgeBracket::new(25, 36).to_string(), "25-36");
    }
}
