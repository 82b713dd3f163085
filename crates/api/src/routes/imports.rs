//! Spreadsheet import handlers.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{ImportLog, ImportResponse, ListImportsResponse};
use persistence::repositories::ImportLogRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::services::{ClientImportService, Upload};

/// Multipart field carrying the workbook.
pub const FILE_FIELD: &str = "file";

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::field(FILE_FIELD, "The file exceeds the maximum upload size")
    } else {
        ApiError::field(FILE_FIELD, format!("Invalid upload: {}", err.body_text()))
    }
}

/// Reads the `file` field; other fields are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload {
        filename: None,
        bytes: Vec::new(),
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        upload.filename = field.file_name().map(str::to_string);
        upload.bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
        break;
    }

    Ok(upload)
}

/// POST /api/v1/imports
pub async fn import_clients(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    let upload = read_upload(multipart).await?;

    let response = ClientImportService::new(state.pool.clone(), &state.config)
        .import(&current.actor, upload)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/imports
///
/// Newest first. Agents only see their own uploads.
pub async fn list_imports(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ListImportsResponse>, ApiError> {
    let owner = (!current.actor.is_supervisor()).then_some(current.actor.user_id);
    let data: Vec<ImportLog> = ImportLogRepository::new(state.pool.clone())
        .list(owner)
        .await?
        .into_iter()
        .map(ImportLog::from)
        .collect();

    let count = data.len();
    Ok(Json(ListImportsResponse { data, count }))
}

/// GET /api/v1/imports/:import_id
pub async fn get_import(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(import_id): Path<Uuid>,
) -> Result<Json<ImportLog>, ApiError> {
    let import: ImportLog = ImportLogRepository::new(state.pool.clone())
        .find_by_id(import_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Import not found".into()))?
        .into();

    if !current.actor.is_supervisor() && import.user_id != Some(current.actor.user_id) {
        return Err(ApiError::Forbidden(
            "You do not have permission to view this import".into(),
        ));
    }

    Ok(Json(import))
}
