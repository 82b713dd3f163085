//! Sales agent entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sales_agents table.
#[derive(Debug, Clone, FromRow)]
pub struct SalesAgentEntity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<SalesAgentEntity> for domain::models::SalesAgent {
    fn from(entity: SalesAgentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            tax_id: entity.tax_id,
            email: entity.email,
            phone: entity.phone,
            created_at: entity.created_at,
        }
    }
}
