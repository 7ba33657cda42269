use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use judging_common::export::{export_filename, write_results};
use sea_orm::{EntityTrait, QueryOrder, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::judge;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::admin::*;
use crate::seed;
use crate::state::AppState;
use crate::utils::filename::content_disposition;
use crate::utils::roster::validate_team_roster;
use crate::utils::snapshot;

#[utoipa::path(
    get,
    path = "/api/v1/admin/rankings",
    tag = "Admin",
    operation_id = "getRankings",
    summary = "Current rankings and summary statistics",
    description = "Ranks every team by the sum of all judges' totals (not the average), ties broken by lower team number. Recomputed from the database on every request.",
    responses(
        (status = 200, description = "Rankings", body = RankingsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn rankings(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<RankingsResponse>, AppError> {
    auth_user.require_admin()?;

    let snapshot = snapshot::load(&state.db).await?;
    let rankings = snapshot.rankings();
    let summary = snapshot.summary(&rankings);

    Ok(Json(RankingsResponse { summary, rankings }))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/teams/{team_id}",
    tag = "Admin",
    operation_id = "getTeamDetail",
    summary = "One team's standing and scoresheets",
    params(("team_id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team detail", body = TeamDetailResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(%team_id))]
pub async fn team_detail(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<TeamDetailResponse>, AppError> {
    auth_user.require_admin()?;

    let snapshot = snapshot::load(&state.db).await?;
    let ranking = snapshot
        .rankings()
        .into_iter()
        .find(|r| r.team_id == team_id)
        .ok_or_else(|| AppError::NotFound("Team not found".into()))?;

    Ok(Json(ranking.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/judges",
    tag = "Admin",
    operation_id = "listJudges",
    summary = "List judges who have signed in",
    responses(
        (status = 200, description = "Judges", body = Vec<JudgeResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_judges(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<JudgeResponse>>, AppError> {
    auth_user.require_admin()?;

    let judges = judge::Entity::find()
        .order_by_asc(judge::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(judges.into_iter().map(JudgeResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/export",
    tag = "Admin",
    operation_id = "exportResults",
    summary = "Download results as CSV",
    description = "Two sections: one summary row per team in rank order, then a blank line, a `Detailed Evaluations` title and one row per evaluation, newest first.",
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn export_results(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let snapshot = snapshot::load(&state.db).await?;
    let rankings = snapshot.rankings();
    let csv = write_results(&rankings, &snapshot.evaluations)?;
    let filename = export_filename(Utc::now().date_naive());

    info!(
        teams = rankings.len(),
        evaluations = snapshot.evaluations.len(),
        %filename,
        "results exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition("attachment", &filename),
            ),
        ],
        csv,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/teams/reset",
    tag = "Admin",
    operation_id = "resetTeams",
    summary = "Replace all teams with the configured roster",
    description = "Deletes every evaluation and team, then inserts the roster from `event.teams`, all in one transaction. Irreversible.",
    responses(
        (status = 200, description = "Teams recreated", body = ResetTeamsResponse),
        (status = 400, description = "Roster empty or invalid (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(admin_id = %auth_user.user_id))]
pub async fn reset_teams(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ResetTeamsResponse>, AppError> {
    auth_user.require_admin()?;

    let roster = &state.config.event.teams;
    validate_team_roster(roster)?;

    let txn = state.db.begin().await?;
    let teams_created = seed::replace_teams(&txn, roster).await?;
    txn.commit().await?;

    info!(teams_created, "team roster reset");
    Ok(Json(ResetTeamsResponse { teams_created }))
}
