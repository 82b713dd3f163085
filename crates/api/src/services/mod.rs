//! Application services used by the route handlers.

pub mod auth;
pub mod client_import;
pub mod export;
pub mod spreadsheet;
pub mod supervisor_bootstrap;

pub use auth::{AuthError, AuthService};
pub use client_import::{ClientImportService, Upload};
pub use supervisor_bootstrap::bootstrap_supervisor;
