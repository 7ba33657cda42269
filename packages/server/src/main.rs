use std::sync::Arc;

use anyhow::Context;
use judging_common::documents::FilesystemDocumentStore;
use tracing::info;

use judging_server::config::AppConfig;
use judging_server::state::AppState;
use judging_server::utils::roster::validate_team_roster;
use judging_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;
    if !config.event.teams.is_empty() {
        validate_team_roster(&config.event.teams)
            .map_err(|err| anyhow::anyhow!("Invalid event.teams: {err:?}"))?;
    }
    seed::seed_teams(&db, &config.event.teams)
        .await
        .context("Failed to seed teams")?;

    let documents = FilesystemDocumentStore::new(
        &config.storage.data_dir,
        config.storage.max_document_size,
    )
    .await
    .context("Failed to open document store")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        documents: Arc::new(documents),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
