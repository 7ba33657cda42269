use std::collections::HashSet;

use crate::config::{JudgeRosterEntry, TeamRosterEntry};
use crate::error::AppError;

pub const UNKNOWN_JUDGE: &str = "Unknown Judge";

/// Display name for a judge, looked up by email (case-insensitive).
pub fn judge_display_name(roster: &[JudgeRosterEntry], email: &str) -> String {
    roster
        .iter()
        .find(|entry| entry.email.eq_ignore_ascii_case(email.trim()))
        .map(|entry| entry.name.clone())
        .unwrap_or_else(|| UNKNOWN_JUDGE.to_string())
}

/// A team roster must be non-empty, with unique non-negative numbers and named leaders.
pub fn validate_team_roster(roster: &[TeamRosterEntry]) -> Result<(), AppError> {
    if roster.is_empty() {
        return Err(AppError::Validation(
            "No teams are configured under event.teams".into(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in roster {
        if entry.team_number < 0 {
            return Err(AppError::Validation(format!(
                "Team number must be >= 0, got {}",
                entry.team_number
            )));
        }
        if entry.team_leader.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Team {} has no team leader",
                entry.team_number
            )));
        }
        if !seen.insert(entry.team_number) {
            return Err(AppError::Validation(format!(
                "Duplicate team number {} in roster",
                entry.team_number
            )));
        }
    }
    Ok(())
}
