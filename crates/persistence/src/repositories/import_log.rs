//! Import log repository.

use domain::models::RowError;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ImportLogEntity;
use crate::metrics::timed;

/// Unique constraint on `import_logs.content_hash`.
pub const IMPORT_HASH_CONSTRAINT: &str = "import_logs_content_hash_key";

const IMPORT_LOG_COLUMNS: &str = r#"
    id, file_path, original_filename, created_at, user_id, succeeded, failed, errors, content_hash
"#;

/// Repository for import log database operations.
#[derive(Clone)]
pub struct ImportLogRepository {
    pool: PgPool,
}

impl ImportLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn hash_exists(&self, content_hash: &str) -> Result<bool, sqlx::Error> {
        timed(
            "import_hash_exists",
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM import_logs WHERE content_hash = $1)")
                .bind(content_hash)
                .fetch_one(&self.pool),
        )
        .await
    }

    /// Inserts the preliminary log with zero counts.
    pub async fn create(
        &self,
        file_path: &str,
        original_filename: &str,
        user_id: Option<Uuid>,
        content_hash: &str,
    ) -> Result<ImportLogEntity, sqlx::Error> {
        timed(
            "create_import_log",
            sqlx::query_as::<_, ImportLogEntity>(&format!(
                r#"
                INSERT INTO import_logs (file_path, original_filename, user_id, content_hash)
                VALUES ($1, $2, $3, $4)
                RETURNING {IMPORT_LOG_COLUMNS}
                "#
            ))
            .bind(file_path)
            .bind(original_filename)
            .bind(user_id)
            .bind(content_hash)
            .fetch_one(&self.pool),
        )
        .await
    }

    /// Stores the final counts and per-row errors.
    pub async fn finalize(
        &self,
        id: Uuid,
        succeeded: i32,
        failed: i32,
        errors: &[RowError],
    ) -> Result<ImportLogEntity, sqlx::Error> {
        timed(
            "finalize_import_log",
            sqlx::query_as::<_, ImportLogEntity>(&format!(
                r#"
                UPDATE import_logs
                SET succeeded = $2, failed = $3, errors = $4
                WHERE id = $1
                RETURNING {IMPORT_LOG_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(succeeded)
            .bind(failed)
            .bind(Json(errors))
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ImportLogEntity>, sqlx::Error> {
        sqlx::query_as::<_, ImportLogEntity>(&format!(
            "SELECT {IMPORT_LOG_COLUMNS} FROM import_logs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Import history, newest first. `user_id` restricts to one uploader.
    pub async fn list(&self, user_id: Option<Uuid>) -> Result<Vec<ImportLogEntity>, sqlx::Error> {
        timed(
            "list_import_logs",
            sqlx::query_as::<_, ImportLogEntity>(&format!(
                r#"
                SELECT {IMPORT_LOG_COLUMNS}
                FROM import_logs
                WHERE ($1::uuid IS NULL OR user_id = $1)
                ORDER BY created_at DESC, id
                "#
            ))
            .bind(user_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn latest(&self) -> Result<Option<ImportLogEntity>, sqlx::Error> {
        sqlx::query_as::<_, ImportLogEntity>(&format!(
            "SELECT {IMPORT_LOG_COLUMNS} FROM import_logs ORDER BY created_at DESC, id LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
    }
}
