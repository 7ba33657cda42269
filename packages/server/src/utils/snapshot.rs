//! Request-scoped view of the whole event, loaded fresh for every admin read.

use std::collections::HashMap;

use judging_common::scoring::{EvaluationRecord, SummaryStats, Team, TeamRanking};
use judging_common::{compute_rankings, summarize};
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{evaluation, judge, team};
use crate::error::AppError;

impl From<team::Model> for Team {
    fn from(m: team::Model) -> Self {
        Self {
            id: m.id,
            team_number: m.team_number,
            team_leader: m.team_leader,
        }
    }
}

pub struct Snapshot {
    /// Ordered by team number.
    pub teams: Vec<Team>,
    pub judges: Vec<judge::Model>,
    /// Newest first.
    pub evaluations: Vec<EvaluationRecord>,
}

impl Snapshot {
    pub fn rankings(&self) -> Vec<TeamRanking> {
        compute_rankings(&self.teams, &self.evaluations)
    }

    pub fn summary(&self, rankings: &[TeamRanking]) -> SummaryStats {
        summarize(&self.teams, &self.evaluations, rankings)
    }
}

#[instrument(skip(db))]
pub async fn load<C: ConnectionTrait>(db: &C) -> Result<Snapshot, AppError> {
    let teams: Vec<Team> = team::Entity::find()
        .order_by_asc(team::Column::TeamNumber)
        .all(db)
        .await?
        .into_iter()
        .map(Team::from)
        .collect();

    let judges = judge::Entity::find()
        .order_by_asc(judge::Column::Name)
        .all(db)
        .await?;

    let rows = evaluation::Entity::find()
        .order_by_desc(evaluation::Column::CreatedAt)
        .order_by_desc(evaluation::Column::Id)
        .all(db)
        .await?;

    let judge_names: HashMap<Uuid, &str> =
        judges.iter().map(|j| (j.id, j.name.as_str())).collect();
    let teams_by_id: HashMap<Uuid, &Team> = teams.iter().map(|t| (t.id, t)).collect();

    let mut evaluations = Vec::with_capacity(rows.len());
    for row in rows {
        let team = teams_by_id.get(&row.team_id).ok_or_else(|| {
            AppError::Internal(format!(
                "evaluation {} references missing team {}",
                row.id, row.team_id
            ))
        })?;
        let judge_name = judge_names.get(&row.judge_id).ok_or_else(|| {
            AppError::Internal(format!(
                "evaluation {} references missing judge {}",
                row.id, row.judge_id
            ))
        })?;

        let record = evaluation_record(row, team, judge_name);
        record.validate().map_err(|e| {
            AppError::Internal(format!("evaluation {} is malformed: {e}", record.id))
        })?;
        evaluations.push(record);
    }

    tracing::debug!(
        teams = teams.len(),
        judges = judges.len(),
        evaluations = evaluations.len(),
        "snapshot loaded"
    );

    Ok(Snapshot {
        teams,
        judges,
        evaluations,
    })
}

/// Join a stored row with its team and judge display data.
pub fn evaluation_record(row: evaluation::Model, team: &Team, judge_name: &str) -> EvaluationRecord {
    EvaluationRecord {
        id: row.id,
        team_id: row.team_id,
        judge_id: row.judge_id,
        judge_name: judge_name.to_string(),
        team_number: team.team_number,
        team_leader: team.team_leader.clone(),
        skit_execution: row.skit_execution,
        slogan_jingle: row.slogan_jingle,
        team_coordination: row.team_coordination,
        total_score: row.total_score,
        offensive_content: row.offensive_content,
        original_content: row.original_content,
        time_limit_followed: row.time_limit_followed,
        created_at: row.created_at,
    }
}
