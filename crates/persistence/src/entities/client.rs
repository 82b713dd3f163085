//! Client entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AgentRef, EntityTypeRef};
use sqlx::FromRow;
use uuid::Uuid;

/// Client row joined with its entity type and owning sales agent.
#[derive(Debug, Clone, FromRow)]
pub struct ClientEntity {
    pub id: Uuid,
    pub entity_type_id: Option<Uuid>,
    pub entity_type_name: Option<String>,
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: String,
    pub website: String,
    pub is_active: bool,
    pub note: String,
    pub agent_id: Option<Uuid>,
    pub agent_name: Option<String>,
    pub agent_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientEntity> for domain::models::Client {
    fn from(entity: ClientEntity) -> Self {
        let entity_type = entity
            .entity_type_id
            .zip(entity.entity_type_name)
            .map(|(id, name)| EntityTypeRef { id, name });
        let agent = entity
            .agent_id
            .zip(entity.agent_name)
            .map(|(id, name)| AgentRef {
                id,
                name,
                user_id: entity.agent_user_id,
            });

        Self {
            id: entity.id,
            entity_type,
            name: entity.name,
            tax_id: entity.tax_id,
            email: entity.email,
            phone: entity.phone,
            website: entity.website,
            is_active: entity.is_active,
            note: entity.note,
            agent,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
