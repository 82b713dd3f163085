use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{AccessError, UploadError};
use persistence::repositories::{
    CLIENT_EMAIL_CONSTRAINT, CLIENT_TAX_ID_CONSTRAINT, IMPORT_HASH_CONSTRAINT,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Message returned when the same file content was already imported.
pub const DUPLICATE_IMPORT_MESSAGE: &str = "This file has already been imported";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Duplicate submission: {0}")]
    DuplicateSubmission(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// A validation error attached to a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::Validation {
            message: message.clone(),
            details: vec![ValidationDetail {
                field: field.to_string(),
                message,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::DuplicateSubmission(msg) => {
                (StatusCode::CONFLICT, "duplicate_submission", msg, None)
            }
            ApiError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                Some(details).filter(|d| !d.is_empty()),
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error_code,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Unique constraints that correspond to a form field.
const FIELD_CONSTRAINTS: [(&str, &str, &str); 6] = [
    (
        CLIENT_TAX_ID_CONSTRAINT,
        "tax_id",
        "A client with this tax id already exists",
    ),
    (
        CLIENT_EMAIL_CONSTRAINT,
        "email",
        "A client with this email already exists",
    ),
    (
        "sales_agents_tax_id_key",
        "tax_id",
        "A sales agent with this tax id already exists",
    ),
    (
        "sales_agents_email_key",
        "email",
        "A sales agent with this email already exists",
    ),
    (
        "sales_agents_user_id_key",
        "user_id",
        "This user already has a sales agent profile",
    ),
    ("users_username_key", "username", "This username is taken"),
];

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint == IMPORT_HASH_CONSTRAINT {
                        return ApiError::DuplicateSubmission(DUPLICATE_IMPORT_MESSAGE.into());
                    }
                    if let Some((_, field, message)) =
                        FIELD_CONSTRAINTS.iter().find(|(name, _, _)| *name == constraint)
                    {
                        return ApiError::field(field, *message);
                    }
                }
                match db_err.code().as_deref() {
                    Some("23505") => ApiError::Conflict("Resource already exists".into()),
                    Some("23503") => ApiError::NotFound("Referenced resource not found".into()),
                    _ => ApiError::Internal(format!("Database error: {}", db_err)),
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

fn collect_details(prefix: &str, errors: &ValidationErrors, out: &mut Vec<ValidationDetail>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| ValidationDetail {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_details(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_details(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_details("", &errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::field("file", err.to_string())
    }
}
