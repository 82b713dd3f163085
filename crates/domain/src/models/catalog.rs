//! Lookup catalogs: entity types for clients and address types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Legal entity type of a client (company, individual, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub id: Uuid,
    pub name: String,
}

/// Kind of address (billing, dispatch, ...). Cannot be deleted while in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEntityTypeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAddressTypeRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub name: String,

    #[serde(default)]
    pub description: String,
}
