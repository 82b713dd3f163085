//! Entity type and address type entities.

use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct EntityTypeEntity {
    pub id: Uuid,
    pub name: String,
}

impl From<EntityTypeEntity> for domain::models::EntityType {
    fn from(entity: EntityTypeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AddressTypeEntity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<AddressTypeEntity> for domain::models::AddressType {
    fn from(entity: AddressTypeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
        }
    }
}
