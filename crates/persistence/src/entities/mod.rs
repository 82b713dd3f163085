//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod address;
pub mod catalog;
pub mod client;
pub mod import_log;
pub mod sales_agent;
pub mod user;

pub use address::AddressEntity;
pub use catalog::{AddressTypeEntity, EntityTypeEntity};
pub use client::ClientEntity;
pub use import_log::ImportLogEntity;
pub use sales_agent::SalesAgentEntity;
pub use user::{UserEntity, UserRoleDb};
