//! Domain layer for the client manager backend.
//!
//! This crate contains:
//! - Domain models (Client, Address, SalesAgent, ImportLog, ...)
//! - The access policy deciding what an actor may touch
//! - The spreadsheet import pipeline, independent of storage

pub mod models;
pub mod services;
