//! Spreadsheet client import.
//!
//! Rows are read by the API layer into [`SheetRow`]s; this module turns them
//! into clients through an [`ImportStore`] and accounts for every row.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::RowError;

/// File extensions accepted for upload (compared case-insensitively).
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Number of positional columns in the import layout.
pub const IMPORT_COLUMNS: usize = 14;

/// First spreadsheet row holding data; row 1 is the header.
pub const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No file was submitted")]
    MissingFile,

    #[error("The submitted file is empty")]
    EmptyFile,

    #[error("Only .xlsx and .xls files are accepted")]
    UnsupportedExtension,
}

/// Pre-flight checks run before any hashing or I/O.
pub fn check_upload(filename: Option<&str>, size: usize) -> Result<(), UploadError> {
    let filename = filename
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(UploadError::MissingFile)?;

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or(UploadError::UnsupportedExtension)?;

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedExtension);
    }

    if size == 0 {
        return Err(UploadError::EmptyFile);
    }

    Ok(())
}

/// One spreadsheet row as text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based spreadsheet row number.
    pub number: usize,
    pub cells: Vec<String>,
}

/// The fourteen import columns of one row, trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    pub entity_type: String,
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub client_note: String,
    pub street: String,
    pub number: String,
    pub locality: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub address_note: String,
}

impl ImportRow {
    /// Builds a row from positional cells; missing trailing cells are empty
    /// and cells past the last column are ignored.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |index: usize| -> String {
            cells
                .get(index)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            entity_type: cell(0),
            name: cell(1),
            tax_id: cell(2),
            email: cell(3),
            phone: cell(4),
            website: cell(5),
            client_note: cell(6),
            street: cell(7),
            number: cell(8),
            locality: cell(9),
            city: cell(10),
            postal_code: cell(11),
            country: cell(12),
            address_note: cell(13),
        }
    }

    pub fn has_required_fields(&self) -> bool {
        [&self.name, &self.tax_id, &self.locality, &self.street]
            .iter()
            .all(|value| !value.is_empty())
    }

    /// Email is optional on import; blank means none.
    pub fn email(&self) -> Option<&str> {
        Some(self.email.as_str()).filter(|email| !email.is_empty())
    }
}

/// Errors a store reports while creating an imported client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportStoreError {
    #[error("client already exists")]
    DuplicateTaxId,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("{0}")]
    Storage(String),
}

/// Settings shared by every row of one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportContext {
    /// Sales agent that will own the created clients.
    pub owner_agent_id: Option<Uuid>,
    /// Address type given to every imported address.
    pub address_type_id: Uuid,
}

/// Storage used by the import pipeline.
#[async_trait]
pub trait ImportStore: Send + Sync {
    async fn tax_id_exists(&self, tax_id: &str) -> Result<bool, ImportStoreError>;

    /// Creates the client and its single address atomically, returning the
    /// new client id.
    async fn create_client_with_address(
        &self,
        row: &ImportRow,
        context: &ImportContext,
    ) -> Result<Uuid, ImportStoreError>;
}

/// Why a row was not imported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowFailure {
    #[error("missing required fields")]
    MissingRequiredFields,

    #[error("client already exists")]
    ClientAlreadyExists,

    #[error(transparent)]
    Store(#[from] ImportStoreError),
}

/// Outcome of processing all rows of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub succeeded: i32,
    pub failed: i32,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!(
            "Import finished: {} clients created, {} errors.",
            self.succeeded, self.failed
        )
    }

    fn record_failure(&mut self, row: usize, failure: RowFailure) {
        self.failed += 1;
        self.errors.push(RowError {
            row,
            error: failure.to_string(),
        });
    }
}

async fn import_row<S: ImportStore + ?Sized>(
    store: &S,
    row: &ImportRow,
    context: &ImportContext,
) -> Result<Uuid, RowFailure> {
    if !row.has_required_fields() {
        return Err(RowFailure::MissingRequiredFields);
    }

    if store.tax_id_exists(&row.tax_id).await? {
        return Err(RowFailure::ClientAlreadyExists);
    }

    Ok(store.create_client_with_address(row, context).await?)
}

/// Processes every row in order. No row failure stops the batch.
pub async fn process_rows<S: ImportStore + ?Sized>(
    store: &S,
    rows: &[SheetRow],
    context: &ImportContext,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for sheet_row in rows {
        let row = ImportRow::from_cells(&sheet_row.cells);
        match import_row(store, &row, context).await {
            Ok(client_id) => {
                debug!(row = sheet_row.number, client_id = %client_id, "Imported client row");
                summary.succeeded += 1;
            }
            Err(failure) => {
                debug!(row = sheet_row.number, reason = %failure, "Import row rejected");
                summary.record_failure(sheet_row.number, failure);
            }
        }
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Processed import rows"
    );

    summary
}
