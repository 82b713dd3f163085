//! Sales agent domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A sales agent. Optionally linked one-to-one to a user account;
/// clients owned by an agent are visible to that user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesAgent {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for registering a sales agent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSalesAgentRequest {
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Tax id must be 1-20 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub tax_id: String,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 15, message = "Phone must be 1-15 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub phone: String,
}
