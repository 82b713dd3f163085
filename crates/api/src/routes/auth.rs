//! Login and account creation handlers.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{CreateUserRequest, LoginRequest, LoginResponse, User};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Supervisor;
use crate::services::AuthService;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let response = AuthService::new(state.pool.clone(), state.jwt.clone())
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(response))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Supervisor(_supervisor): Supervisor,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    request.validate()?;

    let user = AuthService::new(state.pool.clone(), state.jwt.clone())
        .create_user(&request)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}
