//! User repository for database operations.

use domain::models::UserRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, UserRoleDb};
use crate::metrics::timed;

/// Repository for user account database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        timed(
            "find_user_by_id",
            sqlx::query_as::<_, UserEntity>(
                r#"
                SELECT id, username, password_hash, display_name, role, is_active,
                       created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        timed(
            "find_user_by_username",
            sqlx::query_as::<_, UserEntity>(
                r#"
                SELECT id, username, password_hash, display_name, role, is_active,
                       created_at, updated_at
                FROM users
                WHERE username = $1
                "#,
            )
            .bind(username)
            .fetch_optional(&self.pool),
        )
        .await
    }

    /// Create a new user account.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        display_name: &str,
        role: UserRole,
    ) -> Result<UserEntity, sqlx::Error> {
        timed(
            "create_user",
            sqlx::query_as::<_, UserEntity>(
                r#"
                INSERT INTO users (username, password_hash, display_name, role, is_active)
                VALUES ($1, $2, $3, $4, true)
                RETURNING id, username, password_hash, display_name, role, is_active,
                          created_at, updated_at
                "#,
            )
            .bind(username)
            .bind(password_hash)
            .bind(display_name)
            .bind(UserRoleDb::from(role))
            .fetch_one(&self.pool),
        )
        .await
    }
}
