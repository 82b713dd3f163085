//! Address entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::AddressTypeRef;
use sqlx::FromRow;
use uuid::Uuid;

/// Address row joined with its address type name.
#[derive(Debug, Clone, FromRow)]
pub struct AddressEntity {
    pub id: Uuid,
    pub client_id: Uuid,
    pub address_type_id: Uuid,
    pub address_type_name: String,
    pub street: String,
    pub number: String,
    pub locality: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AddressEntity> for domain::models::Address {
    fn from(entity: AddressEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            address_type: AddressTypeRef {
                id: entity.address_type_id,
                name: entity.address_type_name,
            },
            street: entity.street,
            number: entity.number,
            locality: entity.locality,
            city: entity.city,
            postal_code: entity.postal_code,
            country: entity.country,
            note: entity.note,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
