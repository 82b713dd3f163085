//! HTTP route handlers.

pub mod agents;
pub mod auth;
pub mod catalogs;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod imports;
pub mod reports;
