//! Sales agent repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SalesAgentEntity;
use crate::metrics::timed;

/// Repository for sales agent database operations.
#[derive(Clone)]
pub struct SalesAgentRepository {
    pool: PgPool,
}

impl SalesAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all sales agents ordered by name.
    pub async fn list(&self) -> Result<Vec<SalesAgentEntity>, sqlx::Error> {
        timed(
            "list_sales_agents",
            sqlx::query_as::<_, SalesAgentEntity>(
                r#"
                SELECT id, user_id, name, tax_id, email, phone, created_at
                FROM sales_agents
                ORDER BY name, id
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SalesAgentEntity>, sqlx::Error> {
        sqlx::query_as::<_, SalesAgentEntity>(
            r#"
            SELECT id, user_id, name, tax_id, email, phone, created_at
            FROM sales_agents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// The agent profile linked to a user account, if any.
    pub async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SalesAgentEntity>, sqlx::Error> {
        timed(
            "find_sales_agent_by_user",
            sqlx::query_as::<_, SalesAgentEntity>(
                r#"
                SELECT id, user_id, name, tax_id, email, phone, created_at
                FROM sales_agents
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn create(
        &self,
        user_id: Option<Uuid>,
        name: &str,
        tax_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<SalesAgentEntity, sqlx::Error> {
        timed(
            "create_sales_agent",
            sqlx::query_as::<_, SalesAgentEntity>(
                r#"
                INSERT INTO sales_agents (user_id, name, tax_id, email, phone)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, user_id, name, tax_id, email, phone, created_at
                "#,
            )
            .bind(user_id)
            .bind(name)
            .bind(tax_id)
            .bind(email)
            .bind(phone)
            .fetch_one(&self.pool),
        )
        .await
    }
}
