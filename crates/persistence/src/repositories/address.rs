//! Address repository.

use domain::models::AddressInput;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::AddressEntity;
use crate::metrics::timed;

const SELECT_ADDRESS: &str = r#"
    SELECT a.id, a.client_id, a.address_type_id, t.name AS address_type_name,
           a.street, a.number, a.locality, a.city, a.postal_code, a.country, a.note,
           a.created_at, a.updated_at
    FROM addresses a
    JOIN address_types t ON t.id = a.address_type_id
"#;

/// Column values for a new or edited address.
#[derive(Debug, Clone, Copy)]
pub struct AddressValues<'a> {
    pub address_type_id: Uuid,
    pub street: &'a str,
    pub number: &'a str,
    pub locality: &'a str,
    pub city: &'a str,
    pub postal_code: &'a str,
    pub country: &'a str,
    pub note: &'a str,
}

impl<'a> From<&'a AddressInput> for AddressValues<'a> {
    fn from(input: &'a AddressInput) -> Self {
        Self {
            address_type_id: input.address_type_id,
            street: input.street.trim(),
            number: input.number.trim(),
            locality: input.locality.trim(),
            city: input.city.trim(),
            postal_code: input.postal_code.trim(),
            country: input.country.trim(),
            note: &input.note,
        }
    }
}

/// Inserts one address on an open connection or transaction.
pub(crate) async fn insert_address(
    conn: &mut PgConnection,
    client_id: Uuid,
    values: &AddressValues<'_>,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO addresses (client_id, address_type_id, street, number, locality, city,
                               postal_code, country, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(client_id)
    .bind(values.address_type_id)
    .bind(values.street)
    .bind(values.number)
    .bind(values.locality)
    .bind(values.city)
    .bind(values.postal_code)
    .bind(values.country)
    .bind(values.note)
    .fetch_one(conn)
    .await
}

/// Repository for address database operations.
#[derive(Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AddressEntity>, sqlx::Error> {
        sqlx::query_as::<_, AddressEntity>(&format!("{SELECT_ADDRESS} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Addresses of one client, oldest first.
    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<AddressEntity>, sqlx::Error> {
        self.list_for_clients(&[client_id]).await
    }

    /// Addresses of several clients, grouped by client then oldest first.
    pub async fn list_for_clients(
        &self,
        client_ids: &[Uuid],
    ) -> Result<Vec<AddressEntity>, sqlx::Error> {
        timed(
            "list_addresses_for_clients",
            sqlx::query_as::<_, AddressEntity>(&format!(
                "{SELECT_ADDRESS} WHERE a.client_id = ANY($1) ORDER BY a.client_id, a.created_at, a.id"
            ))
            .bind(client_ids)
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn create(
        &self,
        client_id: Uuid,
        values: &AddressValues<'_>,
    ) -> Result<AddressEntity, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let id = insert_address(&mut conn, client_id, values).await?;
        drop(conn);

        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        &self,
        id: Uuid,
        values: &AddressValues<'_>,
    ) -> Result<Option<AddressEntity>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE addresses
            SET address_type_id = $2, street = $3, number = $4, locality = $5, city = $6,
                postal_code = $7, country = $8, note = $9, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(values.address_type_id)
        .bind(values.street)
        .bind(values.number)
        .bind(values.locality)
        .bind(values.city)
        .bind(values.postal_code)
        .bind(values.country)
        .bind(values.note)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Returns whether a row was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
