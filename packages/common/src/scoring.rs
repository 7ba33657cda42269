//! Team ranking and score aggregation.
//!
//! A team's final score is the sum of every judge's total for that team, not
//! the average. Teams seen by more judges can therefore outrank teams seen by
//! fewer; callers must not "normalize" this away.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rubric::{RubricError, Scores};

/// A competing team as seen by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Team {
    pub id: Uuid,
    /// Unique display sequence number, used as the ranking tie-break.
    #[schema(example = 3)]
    pub team_number: i32,
    #[schema(example = "Team Orion")]
    pub team_leader: String,
}

/// One judge's evaluation of one team, joined with judge and team display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EvaluationRecord {
    pub id: Uuid,
    pub team_id: Uuid,
    pub judge_id: Uuid,
    #[schema(example = "Jordan Avery")]
    pub judge_name: String,
    #[schema(example = 3)]
    pub team_number: i32,
    #[schema(example = "Team Orion")]
    pub team_leader: String,
    pub skit_execution: i32,
    pub slogan_jingle: i32,
    pub team_coordination: i32,
    #[schema(example = 42)]
    pub total_score: i32,
    pub offensive_content: bool,
    pub original_content: bool,
    pub time_limit_followed: bool,
    pub created_at: DateTime<Utc>,
}

impl EvaluationRecord {
    pub fn scores(&self) -> Scores {
        Scores::new(
            self.skit_execution,
            self.slogan_jingle,
            self.team_coordination,
        )
    }

    /// Boundary check for rows coming out of the store.
    pub fn validate(&self) -> Result<(), RubricError> {
        self.scores().validate_with_total(self.total_score)
    }

    /// Compliance findings worth surfacing next to the scores.
    pub fn flags(&self) -> Vec<EvaluationFlag> {
        let mut flags = Vec::new();
        if self.offensive_content {
            flags.push(EvaluationFlag::OffensiveContent);
        }
        if !self.original_content {
            flags.push(EvaluationFlag::NotOriginal);
        }
        if !self.time_limit_followed {
            flags.push(EvaluationFlag::TimeLimitExceeded);
        }
        flags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationFlag {
    OffensiveContent,
    NotOriginal,
    TimeLimitExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RankingStatus {
    Flagged,
    NotEvaluated,
    Clean,
}

/// Aggregated standing of one team. Derived on every load, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TeamRanking {
    /// 1-based position after sorting.
    #[schema(example = 1)]
    pub rank: usize,
    pub team_id: Uuid,
    pub team_number: i32,
    pub team_leader: String,
    pub judges_count: usize,
    /// Sum of all judges' totals.
    #[schema(example = 131)]
    pub final_score: i64,
    pub has_offensive_content: bool,
    pub avg_skit_execution: f64,
    pub avg_slogan_jingle: f64,
    pub avg_team_coordination: f64,
    pub status: RankingStatus,
    pub evaluations: Vec<EvaluationRecord>,
}

impl TeamRanking {
    fn new(team: &Team, evaluations: Vec<EvaluationRecord>) -> Self {
        let judges_count = evaluations.len();
        let final_score: i64 = evaluations
            .iter()
            .map(|e| i64::from(e.total_score))
            .sum();
        let has_offensive_content = evaluations.iter().any(|e| e.offensive_content);

        let avg_skit_execution = mean(evaluations.iter().map(|e| e.skit_execution), judges_count);
        let avg_slogan_jingle = mean(evaluations.iter().map(|e| e.slogan_jingle), judges_count);
        let avg_team_coordination =
            mean(evaluations.iter().map(|e| e.team_coordination), judges_count);

        let status = if has_offensive_content {
            RankingStatus::Flagged
        } else if judges_count == 0 {
            RankingStatus::NotEvaluated
        } else {
            RankingStatus::Clean
        };

        Self {
            rank: 0,
            team_id: team.id,
            team_number: team.team_number,
            team_leader: team.team_leader.clone(),
            judges_count,
            final_score,
            has_offensive_content,
            avg_skit_execution,
            avg_slogan_jingle,
            avg_team_coordination,
            status,
            evaluations,
        }
    }
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SummaryStats {
    pub total_teams: usize,
    pub total_evaluations: usize,
    /// Distinct judges with at least one submitted evaluation.
    pub active_judges: usize,
    /// Mean final score over teams that received at least one evaluation.
    pub average_score: f64,
}

/// Rank every team by final score (descending), breaking ties by team number.
///
/// Evaluations keep their input order inside each team. Evaluations whose team
/// is not in `teams` are ignored.
pub fn compute_rankings(teams: &[Team], evaluations: &[EvaluationRecord]) -> Vec<TeamRanking> {
    let mut by_team: HashMap<Uuid, Vec<EvaluationRecord>> = HashMap::new();
    for evaluation in evaluations {
        by_team
            .entry(evaluation.team_id)
            .or_default()
            .push(evaluation.clone());
    }

    let mut rankings: Vec<TeamRanking> = teams
        .iter()
        .map(|team| TeamRanking::new(team, by_team.remove(&team.id).unwrap_or_default()))
        .collect();

    rankings.sort_by(|a, b| {
        b.final_score
            .cmp(&a.final_score)
            .then_with(|| a.team_number.cmp(&b.team_number))
    });

    for (index, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = index + 1;
    }

    rankings
}

pub fn summarize(
    teams: &[Team],
    evaluations: &[EvaluationRecord],
    rankings: &[TeamRanking],
) -> SummaryStats {
    let active_judges = evaluations
        .iter()
        .map(|e| e.judge_id)
        .collect::<HashSet<_>>()
        .len();

    let evaluated: Vec<i64> = rankings
        .iter()
        .filter(|r| r.judges_count > 0)
        .map(|r| r.final_score)
        .collect();
    let average_score = if evaluated.is_empty() {
        0.0
    } else {
        round_one_decimal(evaluated.iter().sum::<i64>() as f64 / evaluated.len() as f64)
    };

    SummaryStats {
        total_teams: teams.len(),
        total_evaluations: evaluations.len(),
        active_judges,
        average_score,
    }
}

fn mean(values: impl Iterator<Item = i32>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let sum: i64 = values.map(i64::from).sum();
    round_one_decimal(sum as f64 / count as f64)
}

/// Round a non-negative value to one decimal place from its exact binary
/// value, as dashboards using `toFixed(1)` display it: `0.15` is stored just
/// below the midpoint and rounds down, while exact midpoints such as `0.25`
/// round up.
pub fn round_one_decimal(value: f64) -> f64 {
    let twentieths = (value * 20.0).round();
    let exact_midpoint = twentieths % 2.0 == 1.0 && value.mul_add(20.0, -twentieths) == 0.0;
    if exact_midpoint {
        return (twentieths + 1.0) / 2.0 / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}
