//! Supervisor dashboard handler.

use axum::{extract::State, Json};
use domain::models::DashboardSummary;
use persistence::repositories::DashboardRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Supervisor;

/// GET /api/v1/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Supervisor(_supervisor): Supervisor,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = DashboardRepository::new(state.pool.clone())
        .summary()
        .await?;

    Ok(Json(summary))
}
