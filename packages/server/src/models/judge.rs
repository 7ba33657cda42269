use chrono::{DateTime, Utc};
use judging_common::rubric::Scores;
use judging_common::scoring::{EvaluationFlag, EvaluationRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::judge;

#[derive(Serialize, utoipa::ToSchema)]
pub struct JudgeProfile {
    pub id: Uuid,
    #[schema(example = "Jordan Avery")]
    pub name: String,
    #[schema(example = "jordan@judge.example.com")]
    pub email: String,
}

impl From<judge::Model> for JudgeProfile {
    fn from(m: judge::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
        }
    }
}

/// A team as listed on the judge's scoring screen.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamListItem {
    pub id: Uuid,
    #[schema(example = 3)]
    pub team_number: i32,
    #[schema(example = "Team Orion")]
    pub team_leader: String,
    /// Whether the calling judge has already scored this team.
    pub evaluated: bool,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitEvaluationRequest {
    #[schema(example = 17)]
    pub skit_execution: i32,
    #[schema(example = 12)]
    pub slogan_jingle: i32,
    #[schema(example = 13)]
    pub team_coordination: i32,
    pub offensive_content: bool,
    pub original_content: bool,
    pub time_limit_followed: bool,
}

impl SubmitEvaluationRequest {
    pub fn scores(&self) -> Scores {
        Scores::new(
            self.skit_execution,
            self.slogan_jingle,
            self.team_coordination,
        )
    }
}

/// The caller's own scoresheet for one team.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EvaluationResponse {
    pub id: Uuid,
    pub team_id: Uuid,
    pub team_number: i32,
    pub team_leader: String,
    pub skit_execution: i32,
    pub slogan_jingle: i32,
    pub team_coordination: i32,
    #[schema(example = 42)]
    pub total_score: i32,
    pub offensive_content: bool,
    pub original_content: bool,
    pub time_limit_followed: bool,
    pub flags: Vec<EvaluationFlag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EvaluationResponse {
    pub fn new(record: EvaluationRecord, updated_at: DateTime<Utc>) -> Self {
        let flags = record.flags();
        Self {
            id: record.id,
            team_id: record.team_id,
            team_number: record.team_number,
            team_leader: record.team_leader,
            skit_execution: record.skit_execution,
            slogan_jingle: record.slogan_jingle,
            team_coordination: record.team_coordination,
            total_score: record.total_score,
            offensive_content: record.offensive_content,
            original_content: record.original_content,
            time_limit_followed: record.time_limit_followed,
            flags,
            created_at: record.created_at,
            updated_at,
        }
    }
}
