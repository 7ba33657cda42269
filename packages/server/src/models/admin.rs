use chrono::{DateTime, Utc};
use judging_common::scoring::{
    EvaluationFlag, EvaluationRecord, RankingStatus, SummaryStats, TeamRanking,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::judge;

#[derive(Serialize, utoipa::ToSchema)]
pub struct RankingsResponse {
    pub summary: SummaryStats,
    /// Best first.
    pub rankings: Vec<TeamRanking>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EvaluationDetail {
    #[serde(flatten)]
    pub evaluation: EvaluationRecord,
    pub flags: Vec<EvaluationFlag>,
}

impl From<EvaluationRecord> for EvaluationDetail {
    fn from(evaluation: EvaluationRecord) -> Self {
        let flags = evaluation.flags();
        Self { evaluation, flags }
    }
}

/// One team's standing with every scoresheet behind it.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamDetailResponse {
    pub rank: usize,
    pub team_id: Uuid,
    pub team_number: i32,
    pub team_leader: String,
    pub judges_count: usize,
    pub final_score: i64,
    pub has_offensive_content: bool,
    pub avg_skit_execution: f64,
    pub avg_slogan_jingle: f64,
    pub avg_team_coordination: f64,
    pub status: RankingStatus,
    pub evaluations: Vec<EvaluationDetail>,
}

impl From<TeamRanking> for TeamDetailResponse {
    fn from(r: TeamRanking) -> Self {
        Self {
            rank: r.rank,
            team_id: r.team_id,
            team_number: r.team_number,
            team_leader: r.team_leader,
            judges_count: r.judges_count,
            final_score: r.final_score,
            has_offensive_content: r.has_offensive_content,
            avg_skit_execution: r.avg_skit_execution,
            avg_slogan_jingle: r.avg_slogan_jingle,
            avg_team_coordination: r.avg_team_coordination,
            status: r.status,
            evaluations: r.evaluations.into_iter().map(EvaluationDetail::from).collect(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct JudgeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<judge::Model> for JudgeResponse {
    fn from(m: judge::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResetTeamsResponse {
    #[schema(example = 12)]
    pub teams_created: usize,
}
