//! Domain services for the client manager.
//!
//! Services contain business logic that operates on domain models.

pub mod access;
pub mod import;

pub use access::{
    can_access_client, ensure_client_access, ensure_supervisor, AccessError, Actor, RecordScope,
};

pub use import::{
    check_upload, process_rows, ImportContext, ImportRow, ImportStore, ImportStoreError,
    ImportSummary, RowFailure, SheetRow, UploadError, ACCEPTED_EXTENSIONS, FIRST_DATA_ROW,
    IMPORT_COLUMNS,
};
