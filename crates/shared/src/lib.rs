//! Shared utilities and common types for the client manager backend.
//!
//! This crate provides functionality used across the other crates:
//! - Content hashing for uploaded files
//! - Password hashing with Argon2id
//! - JWT access token issuing and validation

pub mod crypto;
pub mod jwt;
pub mod password;
