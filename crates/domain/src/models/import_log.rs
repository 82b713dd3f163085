//! Spreadsheet import log models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RowError {
    /// Spreadsheet row number (1-indexed; the header is row 1).
    pub row: usize,
    pub error: String,
}

/// Record of one spreadsheet submission.
///
/// `content_hash` is unique: the same file bytes can only be imported once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ImportLog {
    pub id: Uuid,
    pub file_path: String,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub succeeded: i32,
    pub failed: i32,
    pub errors: Vec<RowError>,
    pub content_hash: String,
}

/// Response returned once an upload has been processed.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub import: ImportLog,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListImportsResponse {
    pub data: Vec<ImportLog>,
    pub count: usize,
}
