use std::sync::Arc;

use judging_common::documents::DocumentStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub documents: Arc<dyn DocumentStore>,
}
