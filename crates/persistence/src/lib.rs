//! Persistence layer for the client manager backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the import store

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
