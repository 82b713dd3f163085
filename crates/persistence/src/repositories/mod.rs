//! Repository implementations for database operations.

pub mod address;
pub mod catalog;
pub mod client;
pub mod client_import;
pub mod dashboard;
pub mod import_log;
pub mod sales_agent;
pub mod user;

pub use address::{AddressRepository, AddressValues};
pub use catalog::{AddressTypeDeletion, CatalogRepository};
pub use client::{ClientRepository, CLIENT_EMAIL_CONSTRAINT, CLIENT_TAX_ID_CONSTRAINT};
pub use client_import::PgImportStore;
pub use dashboard::DashboardRepository;
pub use import_log::{ImportLogRepository, IMPORT_HASH_CONSTRAINT};
pub use sales_agent::SalesAgentRepository;
pub use user::UserRepository;
