//! Login and account creation.

use domain::models::{CreateUserRequest, LoginResponse, User};
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, validate_password_strength, verify_password, PasswordError};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User is disabled")]
    UserDisabled,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::UserDisabled => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Password(PasswordError::TooShort) => {
                ApiError::field("password", PasswordError::TooShort.to_string())
            }
            AuthError::Password(e) => ApiError::Internal(e.to_string()),
            AuthError::Token(e) => ApiError::Internal(e.to_string()),
            AuthError::Database(e) => e.into(),
        }
    }
}

/// Account operations backed by the users table.
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Checks credentials and issues an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user: User = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?
            .into();

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let issued = self.jwt.issue_access_token(user.id)?;
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            access_token: issued.token,
            token_type: "Bearer",
            expires_at: issued.expires_at,
            user,
        })
    }

    /// Creates an account with a hashed password.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, AuthError> {
        validate_password_strength(&request.password)?;
        let password_hash = hash_password(&request.password)?;

        let user: User = self
            .users
            .create_user(
                request.username.trim(),
                &password_hash,
                request.display_name.trim(),
                request.role,
            )
            .await?
            .into();

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }
}
