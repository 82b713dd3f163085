//! Import log entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::RowError;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the import_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct ImportLogEntity {
    pub id: Uuid,
    pub file_path: String,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub succeeded: i32,
    pub failed: i32,
    pub errors: Json<Vec<RowError>>,
    pub content_hash: String,
}

impl From<ImportLogEntity> for domain::models::ImportLog {
    fn from(entity: ImportLogEntity) -> Self {
        Self {
            id: entity.id,
            file_path: entity.file_path,
            original_filename: entity.original_filename,
            created_at: entity.created_at,
            user_id: entity.user_id,
            succeeded: entity.succeeded,
            failed: entity.failed,
            errors: entity.errors.0,
            content_hash: entity.content_hash,
        }
    }
}
