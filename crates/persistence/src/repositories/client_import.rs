//! PostgreSQL-backed store for the spreadsheet import pipeline.

use async_trait::async_trait;
use domain::services::{ImportContext, ImportRow, ImportStore, ImportStoreError};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::address::{insert_address, AddressValues};
use super::client::{CLIENT_EMAIL_CONSTRAINT, CLIENT_TAX_ID_CONSTRAINT};

/// Creates imported clients, one transaction per row.
#[derive(Clone)]
pub struct PgImportStore {
    pool: PgPool,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_row(
        &self,
        row: &ImportRow,
        context: &ImportContext,
    ) -> Result<Uuid, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entity_type_id: Option<Uuid> = if row.entity_type.is_empty() {
            None
        } else {
            sqlx::query_scalar("SELECT id FROM entity_types WHERE LOWER(name) = LOWER($1)")
                .bind(&row.entity_type)
                .fetch_optional(&mut *tx)
                .await?
        };

        let client_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO clients (entity_type_id, name, tax_id, email, phone, website,
                                 is_active, note, agent_id)
            VALUES ($1, $2, $3, $4, $5, $6, true, $7, $8)
            RETURNING id
            "#,
        )
        .bind(entity_type_id)
        .bind(&row.name)
        .bind(&row.tax_id)
        .bind(row.email())
        .bind(&row.phone)
        .bind(&row.website)
        .bind(&row.client_note)
        .bind(context.owner_agent_id)
        .fetch_one(&mut *tx)
        .await?;

        let address = AddressValues {
            address_type_id: context.address_type_id,
            street: &row.street,
            number: &row.number,
            locality: &row.locality,
            city: &row.city,
            postal_code: &row.postal_code,
            country: &row.country,
            note: &row.address_note,
        };
        insert_address(&mut tx, client_id, &address).await?;

        tx.commit().await?;
        Ok(client_id)
    }
}

/// Maps a database failure to the reason recorded for the row.
fn store_error(err: sqlx::Error) -> ImportStoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some(CLIENT_TAX_ID_CONSTRAINT) => return ImportStoreError::DuplicateTaxId,
            Some(CLIENT_EMAIL_CONSTRAINT) => return ImportStoreError::DuplicateEmail,
            _ => {}
        }
        // 22001: value too long for column
        if db_err.code().as_deref() == Some("22001") {
            return ImportStoreError::Storage("value too long".to_string());
        }
    }
    warn!(error = %err, "Import row could not be stored");
    ImportStoreError::Storage("could not be saved".to_string())
}

#[async_trait]
impl ImportStore for PgImportStore {
    async fn tax_id_exists(&self, tax_id: &str) -> Result<bool, ImportStoreError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE tax_id = $1)")
            .bind(tax_id)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn create_client_with_address(
        &self,
        row: &ImportRow,
        context: &ImportContext,
    ) -> Result<Uuid, ImportStoreError> {
        self.insert_row(row, context).await.map_err(store_error)
    }
}
