use std::collections::{HashMap, HashSet};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use judging_common::scoring::Team;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::{evaluation, judge, team};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::judge::*;
use crate::state::AppState;
use crate::utils::roster::judge_display_name;
use crate::utils::snapshot::evaluation_record;

#[utoipa::path(
    get,
    path = "/api/v1/judges/me",
    tag = "Judging",
    operation_id = "getCurrentJudge",
    summary = "Get the calling judge's profile",
    description = "Returns the judge record for the caller, creating it on first use. The display name comes from the configured judge roster.",
    responses(
        (status = 200, description = "Judge profile", body = JudgeProfile),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(judge_id = %auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<JudgeProfile>, AppError> {
    auth_user.require_judge()?;
    let judge = ensure_judge(&state, &auth_user).await?;
    Ok(Json(judge.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "Judging",
    operation_id = "listTeams",
    summary = "List teams to score",
    description = "Returns every team ordered by team number, marking the ones the caller has already evaluated.",
    responses(
        (status = 200, description = "Team list", body = Vec<TeamListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(judge_id = %auth_user.user_id))]
pub async fn list_teams(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamListItem>>, AppError> {
    auth_user.require_judge()?;

    let evaluated: HashSet<Uuid> = evaluation::Entity::find()
        .select_only()
        .column(evaluation::Column::TeamId)
        .filter(evaluation::Column::JudgeId.eq(auth_user.user_id))
        .into_tuple::<Uuid>()
        .all(&state.db)
        .await?
        .into_iter()
        .collect();

    let teams = team::Entity::find()
        .order_by_asc(team::Column::TeamNumber)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| TeamListItem {
            evaluated: evaluated.contains(&t.id),
            id: t.id,
            team_number: t.team_number,
            team_leader: t.team_leader,
        })
        .collect();

    Ok(Json(teams))
}

#[utoipa::path(
    get,
    path = "/api/v1/evaluations/mine",
    tag = "Judging",
    operation_id = "listMyEvaluations",
    summary = "List the caller's evaluations",
    description = "Returns every evaluation the caller has submitted, newest first.",
    responses(
        (status = 200, description = "Evaluations", body = Vec<EvaluationResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(judge_id = %auth_user.user_id))]
pub async fn my_evaluations(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<EvaluationResponse>>, AppError> {
    auth_user.require_judge()?;

    let rows = evaluation::Entity::find()
        .filter(evaluation::Column::JudgeId.eq(auth_user.user_id))
        .order_by_desc(evaluation::Column::CreatedAt)
        .all(&state.db)
        .await?;
    if rows.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let judge_name = judge::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .map(|j| j.name)
        .unwrap_or_default();

    let team_ids: Vec<Uuid> = rows.iter().map(|r| r.team_id).collect();
    let teams: HashMap<Uuid, Team> = team::Entity::find()
        .filter(team::Column::Id.is_in(team_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| (t.id, Team::from(t)))
        .collect();

    let mut evaluations = Vec::with_capacity(rows.len());
    for row in rows {
        let team = teams.get(&row.team_id).ok_or_else(|| {
            AppError::Internal(format!("evaluation {} references missing team", row.id))
        })?;
        let updated_at = row.updated_at;
        evaluations.push(EvaluationResponse::new(
            evaluation_record(row, team, &judge_name),
            updated_at,
        ));
    }

    Ok(Json(evaluations))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/evaluation",
    tag = "Judging",
    operation_id = "getMyEvaluation",
    summary = "Get the caller's evaluation of a team",
    description = "Returns the caller's saved scoresheet for the team so the form can be prefilled.",
    params(("team_id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Saved evaluation", body = EvaluationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team or evaluation not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(judge_id = %auth_user.user_id, %team_id))]
pub async fn get_my_evaluation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<EvaluationResponse>, AppError> {
    auth_user.require_judge()?;

    let team = find_team(&state, team_id).await?;
    let row = find_evaluation(&state, auth_user.user_id, team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("You have not evaluated this team yet".into()))?;

    Ok(Json(respond_with(&state, row, &team).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/teams/{team_id}/evaluation",
    tag = "Judging",
    operation_id = "submitEvaluation",
    summary = "Submit or overwrite the caller's evaluation of a team",
    description = "Scores are bounded per category (skit execution 0-20, slogan/jingle 0-15, team coordination 0-15). The total is computed by the server. Submitting again for the same team replaces the earlier scores.",
    params(("team_id" = Uuid, Path, description = "Team ID")),
    request_body = SubmitEvaluationRequest,
    responses(
        (status = 201, description = "Evaluation created", body = EvaluationResponse),
        (status = 200, description = "Evaluation overwritten", body = EvaluationResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(judge_id = %auth_user.user_id, %team_id))]
pub async fn submit_evaluation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
    AppJson(payload): AppJson<SubmitEvaluationRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_judge()?;

    let scores = payload.scores();
    scores.validate()?;

    let team = find_team(&state, team_id).await?;
    let judge = ensure_judge(&state, &auth_user).await?;

    // A conflicting upsert keeps the existing row id, so the re-read id tells
    // whether this request created the row.
    let candidate_id = Uuid::now_v7();
    let now = Utc::now();
    let model = evaluation::ActiveModel {
        id: Set(candidate_id),
        judge_id: Set(judge.id),
        team_id: Set(team_id),
        skit_execution: Set(scores.skit_execution),
        slogan_jingle: Set(scores.slogan_jingle),
        team_coordination: Set(scores.team_coordination),
        total_score: Set(scores.total()),
        offensive_content: Set(payload.offensive_content),
        original_content: Set(payload.original_content),
        time_limit_followed: Set(payload.time_limit_followed),
        created_at: Set(now),
        updated_at: Set(now),
    };

    evaluation::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([evaluation::Column::JudgeId, evaluation::Column::TeamId])
                .update_columns([
                    evaluation::Column::SkitExecution,
                    evaluation::Column::SloganJingle,
                    evaluation::Column::TeamCoordination,
                    evaluation::Column::TotalScore,
                    evaluation::Column::OffensiveContent,
                    evaluation::Column::OriginalContent,
                    evaluation::Column::TimeLimitFollowed,
                    evaluation::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    let saved = find_evaluation(&state, judge.id, team_id)
        .await?
        .ok_or_else(|| AppError::Internal("evaluation missing after upsert".into()))?;
    let created = saved.id == candidate_id;

    info!(
        total_score = saved.total_score,
        overwritten = !created,
        "evaluation saved"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(respond_with(&state, saved, &team).await?)))
}

/// Load the caller's judge row, creating it on first use.
///
/// Concurrent first requests race on the primary key; the loser's insert is a no-op.
async fn ensure_judge(state: &AppState, auth_user: &AuthUser) -> Result<judge::Model, AppError> {
    let email = auth_user
        .email
        .clone()
        .ok_or(AppError::PermissionDenied)?;

    let model = judge::ActiveModel {
        id: Set(auth_user.user_id),
        name: Set(judge_display_name(&state.config.event.judges, &email)),
        email: Set(email),
        created_at: Set(Utc::now()),
    };

    let result = judge::Entity::insert(model)
        .on_conflict(
            OnConflict::column(judge::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await;

    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => {}
        Ok(_) => info!(judge_id = %auth_user.user_id, "registered judge"),
        Err(e) => return Err(e.into()),
    }

    judge::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal("judge missing after insert".into()))
}

async fn find_team(state: &AppState, team_id: Uuid) -> Result<Team, AppError> {
    team::Entity::find_by_id(team_id)
        .one(&state.db)
        .await?
        .map(Team::from)
        .ok_or_else(|| AppError::NotFound("Team not found".into()))
}

async fn find_evaluation(
    state: &AppState,
    judge_id: Uuid,
    team_id: Uuid,
) -> Result<Option<evaluation::Model>, AppError> {
    Ok(evaluation::Entity::find()
        .filter(evaluation::Column::JudgeId.eq(judge_id))
        .filter(evaluation::Column::TeamId.eq(team_id))
        .one(&state.db)
        .await?)
}

async fn respond_with(
    state: &AppState,
    row: evaluation::Model,
    team: &Team,
) -> Result<EvaluationResponse, AppError> {
    let judge_name = judge::Entity::find_by_id(row.judge_id)
        .one(&state.db)
        .await?
        .map(|j| j.name)
        .unwrap_or_default();
    let updated_at = row.updated_at;
    Ok(EvaluationResponse::new(
        evaluation_record(row, team, &judge_name),
        updated_at,
    ))
}
