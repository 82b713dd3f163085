//! Client repository.

use domain::models::{CreateClientRequest, UpdateClientRequest};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::address::{insert_address, AddressValues};
use crate::entities::ClientEntity;
use crate::metrics::timed;

pub(crate) const SELECT_CLIENT: &str = r#"
    SELECT c.id, c.entity_type_id, et.name AS entity_type_name, c.name, c.tax_id, c.email,
           c.phone, c.website, c.is_active, c.note, c.agent_id, sa.name AS agent_name,
           sa.user_id AS agent_user_id, c.created_at, c.updated_at
    FROM clients c
    LEFT JOIN entity_types et ON et.id = c.entity_type_id
    LEFT JOIN sales_agents sa ON sa.id = c.agent_id
"#;

/// Unique constraint on `clients.tax_id`.
pub const CLIENT_TAX_ID_CONSTRAINT: &str = "clients_tax_id_key";
/// Unique constraint on `clients.email`.
pub const CLIENT_EMAIL_CONSTRAINT: &str = "clients_email_key";

/// Repository for client database operations.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists clients ordered by name.
    ///
    /// With `owner_user_id` set, only clients whose sales agent is linked to
    /// that user are returned.
    pub async fn list(&self, owner_user_id: Option<Uuid>) -> Result<Vec<ClientEntity>, sqlx::Error> {
        timed(
            "list_clients",
            sqlx::query_as::<_, ClientEntity>(&format!(
                "{SELECT_CLIENT} WHERE ($1::uuid IS NULL OR sa.user_id = $1) ORDER BY c.name, c.id"
            ))
            .bind(owner_user_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ClientEntity>, sqlx::Error> {
        timed(
            "find_client_by_id",
            sqlx::query_as::<_, ClientEntity>(&format!("{SELECT_CLIENT} WHERE c.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Creates a client and all of its addresses in one transaction.
    pub async fn create_with_addresses(
        &self,
        request: &CreateClientRequest,
        agent_id: Option<Uuid>,
    ) -> Result<ClientEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let client_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO clients (entity_type_id, name, tax_id, email, phone, website,
                                 is_active, note, agent_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(request.entity_type_id)
        .bind(request.name.trim())
        .bind(request.tax_id.trim())
        .bind(request.email.trim())
        .bind(request.phone.trim())
        .bind(request.website.trim())
        .bind(request.is_active)
        .bind(&request.note)
        .bind(agent_id)
        .fetch_one(&mut *tx)
        .await?;

        for address in &request.addresses {
            insert_address(&mut tx, client_id, &AddressValues::from(address)).await?;
        }

        tx.commit().await?;
        debug!(client_id = %client_id, "Client created with addresses");

        self.find_by_id(client_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Updates the basic client fields. Returns `None` when the client is gone.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateClientRequest,
        agent_id: Option<Uuid>,
    ) -> Result<Option<ClientEntity>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET entity_type_id = $2, name = $3, tax_id = $4, email = $5, phone = $6,
                website = $7, is_active = $8, note = $9, agent_id = $10, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(request.entity_type_id)
        .bind(request.name.trim())
        .bind(request.tax_id.trim())
        .bind(request.email.trim())
        .bind(request.phone.trim())
        .bind(request.website.trim())
        .bind(request.is_active)
        .bind(&request.note)
        .bind(agent_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Deletes a client; its addresses go with it.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
