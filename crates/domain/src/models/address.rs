//! Client address domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Address type reference embedded in an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressTypeRef {
    pub id: Uuid,
    pub name: String,
}

/// An address belonging to exactly one client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub client_id: Uuid,
    pub address_type: AddressTypeRef,
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

impl Address {
    /// Street and number as printed on exports, e.g. "Av. Matta 1020".
    pub fn street_line(&self) -> String {
        join_street(&self.street, &self.number)
    }
}

/// Joins street and number, skipping an empty number.
pub fn join_street(street: &str, number: &str) -> String {
    if number.trim().is_empty() {
        street.trim().to_string()
    } else {
        format!("{} {}", street.trim(), number.trim())
    }
}

/// Address fields as submitted on client creation or address add/edit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddressInput {
    pub address_type_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Street must be 1-100 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub street: String,

    #[validate(length(min = 1, max = 20, message = "Number must be 1-20 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub number: String,

    #[validate(length(min = 1, max = 100, message = "Locality must be 1-100 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub locality: String,

    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub city: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "Postal code must be at most 20 characters"))]
    pub postal_code: String,

    #[validate(length(min = 1, max = 100, message = "Country must be 1-100 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub country: String,

    #[serde(default)]
    pub note: String,
}
