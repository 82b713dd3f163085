//! Sales agent handlers.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{CreateSalesAgentRequest, SalesAgent};
use persistence::repositories::{SalesAgentRepository, UserRepository};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, Supervisor};

/// GET /api/v1/agents
pub async fn list_agents(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<SalesAgent>>, ApiError> {
    let agents = SalesAgentRepository::new(state.pool.clone())
        .list()
        .await?
        .into_iter()
        .map(SalesAgent::from)
        .collect();

    Ok(Json(agents))
}

/// POST /api/v1/agents
pub async fn create_agent(
    State(state): State<AppState>,
    Supervisor(_supervisor): Supervisor,
    Json(request): Json<CreateSalesAgentRequest>,
) -> Result<(StatusCode, Json<SalesAgent>), ApiError> {
    request.validate()?;

    if let Some(user_id) = request.user_id {
        UserRepository::new(state.pool.clone())
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::field("user_id", "User not found"))?;
    }

    let agent: SalesAgent = SalesAgentRepository::new(state.pool.clone())
        .create(
            request.user_id,
            request.name.trim(),
            request.tax_id.trim(),
            request.email.trim(),
            request.phone.trim(),
        )
        .await?
        .into();

    info!(agent_id = %agent.id, user_id = ?agent.user_id, "Sales agent created");
    Ok((StatusCode::CREATED, Json(agent)))
}
