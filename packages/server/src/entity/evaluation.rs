use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One judge's scoresheet for one team.
///
/// `(judge_id, team_id)` is unique; the index is created in
/// [`crate::seed::ensure_indexes`].
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub judge_id: Uuid,
    #[sea_orm(belongs_to, from = "judge_id", to = "id")]
    pub judge: HasOne<super::judge::Entity>,

    pub team_id: Uuid,
    #[sea_orm(belongs_to, from = "team_id", to = "id")]
    pub team: HasOne<super::team::Entity>,

    pub skit_execution: i32,
    pub slogan_jingle: i32,
    pub team_coordination: i32,
    /// Always the sum of the three sub-scores.
    pub total_score: i32,

    pub offensive_content: bool,
    pub original_content: bool,
    pub time_limit_followed: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
