use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata for an uploaded file. The bytes live in the document store.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    /// Random v4 id, doubles as the share link.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub filename: String,
    pub content_type: String,
    /// SHA-256 content hash (hex).
    pub content_hash: String,
    pub size: i64,
    pub uploaded_by: Uuid,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
