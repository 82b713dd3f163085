//! Domain models for the client manager.

pub mod address;
pub mod catalog;
pub mod client;
pub mod dashboard;
pub mod import_log;
pub mod sales_agent;
pub mod user;

pub use address::{Address, AddressInput, AddressTypeRef};
pub use catalog::{AddressType, CreateAddressTypeRequest, CreateEntityTypeRequest, EntityType};
pub use client::{
    export_rows, AgentRef, Client, ClientDetail, ClientExportRow, CreateClientRequest,
    EntityTypeRef, ListClientsResponse, UpdateClientRequest, EXPORT_HEADERS,
};
pub use dashboard::{AgentClientCount, DashboardSummary};
pub use import_log::{ImportLog, ImportResponse, ListImportsResponse, RowError};
pub use sales_agent::{CreateSalesAgentRequest, SalesAgent};
pub use user::{CreateUserRequest, LoginRequest, LoginResponse, User, UserRole};

use validator::ValidationError;

/// Rejects text that is empty once surrounding whitespace is removed.
///
/// Stored values are trimmed, so `length(min = 1)` alone lets `"   "`
/// through as an empty string.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field cannot be blank".into());
        return Err(err);
    }
    Ok(())
}
