//! Creates the initial supervisor account on startup.

use domain::models::UserRole;
use persistence::repositories::UserRepository;
use shared::password::{hash_password, validate_password_strength, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::BootstrapConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

/// What the bootstrap step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NotConfigured,
    AlreadyExists,
    Created,
}

/// Creates the configured supervisor unless a user with that username exists.
pub async fn bootstrap_supervisor(
    pool: &PgPool,
    config: &BootstrapConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    let username = match config.supervisor_username.as_deref().map(str::trim) {
        Some(username) if !username.is_empty() => username,
        _ => return Ok(BootstrapOutcome::NotConfigured),
    };

    let Some(password) = config.supervisor_password.as_deref().filter(|p| !p.is_empty()) else {
        warn!("bootstrap.supervisor_username is set without a password, skipping bootstrap");
        return Ok(BootstrapOutcome::NotConfigured);
    };

    let users = UserRepository::new(pool.clone());
    if users.find_by_username(username).await?.is_some() {
        info!(username = %username, "Bootstrap supervisor already exists");
        return Ok(BootstrapOutcome::AlreadyExists);
    }

    validate_password_strength(password)?;
    let password_hash = hash_password(password)?;
    let user = users
        .create_user(username, &password_hash, "Supervisor", UserRole::Supervisor)
        .await?;

    info!(user_id = %user.id, username = %username, "Bootstrap supervisor created");
    warn!("Remove the bootstrap supervisor password from configuration after first login");

    Ok(BootstrapOutcome::Created)
}
