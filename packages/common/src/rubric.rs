use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for the skit execution category.
pub const SKIT_EXECUTION_MAX: i32 = 20;
/// Upper bound for the slogan/jingle category.
pub const SLOGAN_JINGLE_MAX: i32 = 15;
/// Upper bound for the team coordination category.
pub const TEAM_COORDINATION_MAX: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RubricError {
    #[error("{category} must be between 0 and {max}, got {value}")]
    OutOfRange {
        category: &'static str,
        max: i32,
        value: i32,
    },
    #[error("total score {stored} does not match the sum of sub-scores {expected}")]
    TotalMismatch { stored: i32, expected: i32 },
}

/// The three rubric sub-scores a judge awards a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Scores {
    /// Skit execution, 0-20.
    #[schema(example = 17)]
    pub skit_execution: i32,
    /// Slogan or jingle, 0-15.
    #[schema(example = 12)]
    pub slogan_jingle: i32,
    /// Team coordination, 0-15.
    #[schema(example = 13)]
    pub team_coordination: i32,
}

impl Scores {
    pub fn new(skit_execution: i32, slogan_jingle: i32, team_coordination: i32) -> Self {
        Self {
            skit_execution,
            slogan_jingle,
            team_coordination,
        }
    }

    pub fn total(&self) -> i32 {
        self.skit_execution + self.slogan_jingle + self.team_coordination
    }

    /// Check every sub-score against its category bound.
    pub fn validate(&self) -> Result<(), RubricError> {
        check("Skit execution", self.skit_execution, SKIT_EXECUTION_MAX)?;
        check("Slogan/jingle", self.slogan_jingle, SLOGAN_JINGLE_MAX)?;
        check("Team coordination", self.team_coordination, TEAM_COORDINATION_MAX)
    }

    /// Validate a stored row: bounds plus a total that agrees with the sub-scores.
    pub fn validate_with_total(&self, stored_total: i32) -> Result<(), RubricError> {
        self.validate()?;
        let expected = self.total();
        if stored_total != expected {
            return Err(RubricError::TotalMismatch {
                stored: stored_total,
                expected,
            });
        }
        Ok(())
    }
}

fn check(category: &'static str, value: i32, max: i32) -> Result<(), RubricError> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(RubricError::OutOfRange {
            category,
            max,
            value,
        })
    }
}
