//! Entity type and address type repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AddressTypeEntity, EntityTypeEntity};
use crate::metrics::timed;

/// Result of trying to delete an address type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressTypeDeletion {
    Deleted,
    NotFound,
    /// Still referenced by this many addresses.
    InUse(i64),
}

/// Repository for the lookup catalogs.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_entity_types(&self) -> Result<Vec<EntityTypeEntity>, sqlx::Error> {
        sqlx::query_as::<_, EntityTypeEntity>("SELECT id, name FROM entity_types ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_entity_type(&self, id: Uuid) -> Result<Option<EntityTypeEntity>, sqlx::Error> {
        sqlx::query_as::<_, EntityTypeEntity>("SELECT id, name FROM entity_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create_entity_type(&self, name: &str) -> Result<EntityTypeEntity, sqlx::Error> {
        timed(
            "create_entity_type",
            sqlx::query_as::<_, EntityTypeEntity>(
                "INSERT INTO entity_types (name) VALUES ($1) RETURNING id, name",
            )
            .bind(name)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn list_address_types(&self) -> Result<Vec<AddressTypeEntity>, sqlx::Error> {
        sqlx::query_as::<_, AddressTypeEntity>(
            "SELECT id, name, description FROM address_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_address_type(
        &self,
        id: Uuid,
    ) -> Result<Option<AddressTypeEntity>, sqlx::Error> {
        sqlx::query_as::<_, AddressTypeEntity>(
            "SELECT id, name, description FROM address_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create_address_type(
        &self,
        name: &str,
        description: &str,
    ) -> Result<AddressTypeEntity, sqlx::Error> {
        timed(
            "create_address_type",
            sqlx::query_as::<_, AddressTypeEntity>(
                r#"
                INSERT INTO address_types (name, description)
                VALUES ($1, $2)
                RETURNING id, name, description
                "#,
            )
            .bind(name)
            .bind(description)
            .fetch_one(&self.pool),
        )
        .await
    }

    /// Returns the address type with this name, creating it when missing.
    pub async fn find_or_create_address_type(
        &self,
        name: &str,
    ) -> Result<AddressTypeEntity, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO address_types (name, description)
            VALUES ($1, '')
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, AddressTypeEntity>(
            "SELECT id, name, description FROM address_types WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    /// Deletes an address type unless addresses still reference it.
    pub async fn delete_address_type(&self, id: Uuid) -> Result<AddressTypeDeletion, sqlx::Error> {
        let in_use: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM addresses WHERE address_type_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if in_use > 0 {
            return Ok(AddressTypeDeletion::InUse(in_use));
        }

        let result = sqlx::query("DELETE FROM address_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(if result.rows_affected() == 0 {
            AddressTypeDeletion::NotFound
        } else {
            AddressTypeDeletion::Deleted
        })
    }
}
