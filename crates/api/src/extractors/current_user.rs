//! Authenticated user extractors.
//!
//! [`CurrentUser`] resolves the token identity to an active account and the
//! [`Actor`] the access policy works with. [`Supervisor`] additionally
//! requires the supervisor role.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::User;
use domain::services::{ensure_supervisor, Actor};
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::{bearer_token, UserAuth};

/// The authenticated, active user behind the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub actor: Actor,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by require_user_auth on protected routes
        let auth = match parts.extensions.get::<UserAuth>() {
            Some(auth) => auth.clone(),
            None => {
                let token = bearer_token(&parts.headers).ok_or_else(|| {
                    ApiError::Unauthorized("Missing or invalid Authorization header".into())
                })?;
                UserAuth::validate(&state.jwt, token)
                    .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?
            }
        };

        let user: User = UserRepository::new(state.pool.clone())
            .find_by_id(auth.user_id)
            .await?
            .map(User::from)
            .filter(|user| user.is_active)
            .ok_or_else(|| ApiError::Unauthorized("User account is not active".into()))?;

        let actor = Actor::new(user.id, user.role);
        Ok(CurrentUser { user, actor })
    }
}

/// A [`CurrentUser`] holding the supervisor role.
#[derive(Debug, Clone)]
pub struct Supervisor(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for Supervisor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        ensure_supervisor(&current.actor)?;
        Ok(Supervisor(current))
    }
}
