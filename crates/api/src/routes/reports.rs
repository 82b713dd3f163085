//! Client/address query view and its XLSX and PDF exports.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use domain::models::ClientDetail;
use serde::Serialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_export;
use crate::routes::clients::visible_client_details;
use crate::services::export::{
    render_pdf, render_xlsx, ExportError, PDF_CONTENT_TYPE, PDF_FILENAME, XLSX_CONTENT_TYPE, XLSX_FILENAME,
};

#[derive(Debug, Serialize)]
pub struct ClientReportResponse {
    pub data: Vec<ClientDetail>,
    pub count: usize,
}

fn attachment(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Runs a renderer on the blocking pool.
async fn render_blocking<F>(render: F) -> Result<Vec<u8>, ApiError>
where
    F: FnOnce() -> Result<Vec<u8>, ExportError> + Send + 'static,
{
    let bytes = tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| ApiError::Internal(format!("Export task failed: {}", e)))??;
    Ok(bytes)
}

/// GET /api/v1/reports/clients
pub async fn query_clients(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ClientReportResponse>, ApiError> {
    let data = visible_client_details(&state, &current.actor).await?;
    let count = data.len();
    Ok(Json(ClientReportResponse { data, count }))
}

/// GET /api/v1/reports/clients/xlsx
pub async fn export_xlsx(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, ApiError> {
    let clients = visible_client_details(&state, &current.actor).await?;
    let count = clients.len();
    let bytes = render_blocking(move || render_xlsx(&clients)).await?;

    record_export("xlsx");
    info!(user_id = %current.user.id, clients = count, "Exported clients to xlsx");
    Ok(attachment(XLSX_CONTENT_TYPE, XLSX_FILENAME, bytes))
}

/// GET /api/v1/reports/clients/pdf
pub async fn export_pdf(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, ApiError> {
    let clients = visible_client_details(&state, &current.actor).await?;
    let count = clients.len();
    let generated_at = Utc::now();
    let bytes = render_blocking(move || render_pdf(&clients, generated_at)).await?;

    record_export("pdf");
    info!(user_id = %current.user.id, clients = count, "Exported clients to pdf");
    Ok(attachment(PDF_CONTENT_TYPE, PDF_FILENAME, bytes))
}
