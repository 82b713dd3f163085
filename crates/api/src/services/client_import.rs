//! Spreadsheet upload handling: pre-flight checks, deduplication, file
//! persistence and the import log around the row processor.

use domain::models::{ImportLog, ImportResponse};
use domain::services::{check_upload, process_rows, Actor, ImportContext, SheetRow};
use persistence::repositories::{
    CatalogRepository, ImportLogRepository, PgImportStore, SalesAgentRepository,
};
use shared::crypto::sha256_hex;
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ApiError, DUPLICATE_IMPORT_MESSAGE};
use crate::middleware::metrics::record_import_rows;
use crate::services::spreadsheet::{read_first_sheet, SpreadsheetError};

const MAX_STORED_NAME_CHARS: usize = 100;
/// Width of `import_logs.original_filename`.
const MAX_ORIGINAL_NAME_CHARS: usize = 255;
const HASH_PREFIX_CHARS: usize = 8;

/// A file received in the `file` multipart field.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ClientImportService {
    pool: PgPool,
    uploads_dir: PathBuf,
    default_address_type: String,
}

impl ClientImportService {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            uploads_dir: config.uploads.dir.clone(),
            default_address_type: config.import.default_address_type.trim().to_string(),
        }
    }

    pub async fn import(&self, actor: &Actor, upload: Upload) -> Result<ImportResponse, ApiError> {
        check_upload(upload.filename.as_deref(), upload.bytes.len())?;
        let original_filename = truncate_keeping_extension(
            upload.filename.as_deref().unwrap_or_default().trim(),
            MAX_ORIGINAL_NAME_CHARS,
        );

        let logs = ImportLogRepository::new(self.pool.clone());
        let content_hash = sha256_hex(&upload.bytes);
        if logs.hash_exists(&content_hash).await? {
            info!(hash = %content_hash, filename = %original_filename, "Rejected duplicate import");
            return Err(ApiError::DuplicateSubmission(DUPLICATE_IMPORT_MESSAGE.into()));
        }

        let (bytes, parsed) = parse_workbook(upload.bytes).await?;
        let rows = parsed.map_err(|e| {
            warn!(filename = %original_filename, error = %e, "Unreadable import workbook");
            ApiError::field("file", e.to_string())
        })?;

        let context = self.context(actor).await?;
        let stored_path = self
            .store_file(&content_hash, &original_filename, &bytes)
            .await?;
        let log = logs
            .create(
                &stored_path.to_string_lossy(),
                &original_filename,
                Some(actor.user_id),
                &content_hash,
            )
            .await?;

        // Once the log exists its hash blocks resubmission, so the rows and
        // the final counts must not depend on this request future surviving
        // a timeout or a client disconnect.
        let service = self.clone();
        let actor = *actor;
        let import_id = log.id;
        tokio::spawn(async move { service.run(&actor, import_id, &rows, &context).await })
            .await
            .map_err(|e| ApiError::Internal(format!("Import task {} failed: {}", import_id, e)))?
    }

    /// Processes the rows of a logged import and records the outcome.
    async fn run(
        &self,
        actor: &Actor,
        import_id: Uuid,
        rows: &[SheetRow],
        context: &ImportContext,
    ) -> Result<ImportResponse, ApiError> {
        let logs = ImportLogRepository::new(self.pool.clone());
        let summary = process_rows(&PgImportStore::new(self.pool.clone()), rows, context).await;

        let import: ImportLog = logs
            .finalize(import_id, summary.succeeded, summary.failed, &summary.errors)
            .await?
            .into();
        record_import_rows(summary.succeeded, summary.failed);

        info!(
            import_id = %import.id,
            user_id = %actor.user_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Import finished"
        );

        Ok(ImportResponse {
            message: summary.message(),
            import,
        })
    }

    /// Owner and address type applied to every imported row.
    async fn context(&self, actor: &Actor) -> Result<ImportContext, ApiError> {
        let owner_agent_id = if actor.is_supervisor() {
            None
        } else {
            SalesAgentRepository::new(self.pool.clone())
                .find_by_user_id(actor.user_id)
                .await?
                .map(|agent| agent.id)
        };

        let address_type = CatalogRepository::new(self.pool.clone())
            .find_or_create_address_type(&self.default_address_type)
            .await?;

        Ok(ImportContext {
            owner_agent_id,
            address_type_id: address_type.id,
        })
    }

    async fn store_file(
        &self,
        content_hash: &str,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, ApiError> {
        let dir = self.uploads_dir.join("imports");
        let path = stored_path(&dir, content_hash, original_filename);

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to create {}: {}", dir.display(), e)))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(path)
    }
}

/// Parses the workbook off the async runtime, handing the bytes back for storage.
async fn parse_workbook(
    bytes: Vec<u8>,
) -> Result<(Vec<u8>, Result<Vec<SheetRow>, SpreadsheetError>), ApiError> {
    tokio::task::spawn_blocking(move || {
        let parsed = read_first_sheet(&bytes);
        (bytes, parsed)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Workbook parsing task failed: {}", e)))
}

fn stored_path(dir: &Path, content_hash: &str, original_filename: &str) -> PathBuf {
    let prefix: String = content_hash.chars().take(HASH_PREFIX_CHARS).collect();
    dir.join(format!("{}_{}", prefix, sanitize_filename(original_filename)))
}

/// Reduces a client-supplied name to a safe single path component.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "upload".to_string();
    }

    truncate_keeping_extension(cleaned, MAX_STORED_NAME_CHARS)
}

/// Caps `name` at `max_chars` characters, keeping a short extension.
fn truncate_keeping_extension(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let ext = match name.rfind('.') {
        Some(dot) if name[dot..].chars().count() <= 6 => &name[dot..],
        _ => "",
    };
    let stem: String = name
        .chars()
        .take(max_chars - ext.chars().count())
        .collect();
    format!("{}{}", stem, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_filename("clients.xlsx"), "clients.xlsx");
        assert_eq!(sanitize_filename("Clientes 2024 (v2).XLSX"), "Clientes_2024__v2_.XLSX");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\ana\\clients.xls"), "clients.xls");
        assert_eq!(sanitize_filename("..hidden.xlsx"), "hidden.xlsx");
    }

    #[test]
    fn test_sanitize_empty_and_unicode() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename("año.xlsx"), "a_o.xlsx");
    }

    #[test]
    fn test_sanitize_truncates_keeping_extension() {
        let long = format!("{}.xlsx", "a".repeat(300));
        let cleaned = sanitize_filename(&long);
        assert_eq!(cleaned.len(), MAX_STORED_NAME_CHARS);
        assert!(cleaned.ends_with(".xlsx"));
    }

    #[test]
    fn test_original_name_fits_log_column() {
        let long = format!("{}.xlsx", "ñ".repeat(300));
        let kept = truncate_keeping_extension(&long, MAX_ORIGINAL_NAME_CHARS);
        assert_eq!(kept.chars().count(), MAX_ORIGINAL_NAME_CHARS);
        assert!(kept.ends_with(".xlsx"));
        assert_eq!(truncate_keeping_extension("clients.xlsx", 255), "clients.xlsx");
    }

    #[test]
    fn test_truncate_without_extension() {
        let long = "b".repeat(20);
        assert_eq!(truncate_keeping_extension(&long, 8), "bbbbbbbb");
    }

    #[tokio::test]
    async fn test_parse_workbook_returns_bytes() {
        let bytes = b"not a workbook".to_vec();
        let (returned, parsed) = parse_workbook(bytes.clone()).await.unwrap();
        assert_eq!(returned, bytes);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_stored_path_uses_hash_prefix() {
        let hash = sha256_hex(b"workbook");
        let path = stored_path(Path::new("uploads/imports"), &hash, "clients.xlsx");
        assert_eq!(
            path,
            PathBuf::from(format!("uploads/imports/{}_clients.xlsx", &hash[..8]))
        );
    }
}
