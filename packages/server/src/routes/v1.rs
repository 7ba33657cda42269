use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(judge_routes())
        .nest("/admin", admin_routes())
        .nest("/documents", document_routes(state))
}

fn judge_routes() -> Router<AppState> {
    Router::new()
        .route("/judges/me", get(handlers::judge::me))
        .route("/teams", get(handlers::judge::list_teams))
        .route("/evaluations/mine", get(handlers::judge::my_evaluations))
        .route(
            "/teams/{team_id}/evaluation",
            get(handlers::judge::get_my_evaluation).put(handlers::judge::submit_evaluation),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/rankings", get(handlers::admin::rankings))
        .route("/teams/reset", post(handlers::admin::reset_teams))
        .route("/teams/{team_id}", get(handlers::admin::team_detail))
        .route("/judges", get(handlers::admin::list_judges))
        .route("/export", get(handlers::admin::export_results))
}

fn document_routes(state: &AppState) -> Router<AppState> {
    let upload = Router::new()
        .route("/", post(handlers::document::upload_document))
        .layer(handlers::document::upload_body_limit(
            state.documents.max_size(),
        ));

    let view = Router::new().route("/{id}", get(handlers::document::download_document));

    upload.merge(view)
}
