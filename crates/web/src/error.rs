use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use importer::ImporterError;
use serde_json::json;
use std::fmt;
use storage::dto::athlete::collect_validation_errors;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    /// Aggregated field violations, in field order.
    Validation(Vec<String>),
    /// A live athlete with the same name, date of birth and dojo exists.
    Duplicate(String),
    RegistrationClosed,
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
    NotFound,
    InternalServerError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(errors) => write!(f, "Validation error: {}", errors.join("; ")),
            Self::Duplicate(msg) => write!(f, "Duplicate: {}", msg),
            Self::RegistrationClosed => write!(f, "Registration is closed"),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::NotFound => write!(f, "Resource not found"),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Duplicate(_) => StatusCode::CONFLICT,
            Self::RegistrationClosed => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({ "error": "Resource not found" })
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                json!({ "error": msg })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({ "error": "An internal error occurred" })
            }
            Self::Validation(errors) => {
                json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            Self::Duplicate(msg) => {
                json!({ "error": msg })
            }
            Self::RegistrationClosed => {
                json!({ "error": "Registration is closed" })
            }
            Self::BadRequest(msg) => {
                json!({ "error": msg })
            }
            Self::Unauthorized => {
                json!({ "error": "Unauthorized" })
            }
            Self::Forbidden(msg) => {
                json!({ "error": msg })
            }
            Self::NotFound => {
                json!({ "error": "Resource not found" })
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                json!({ "error": "An internal error occurred" })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

impl From<ValidationErrors> for WebError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(collect_validation_errors(&errors))
    }
}

impl From<ImporterError> for WebError {
    fn from(error: ImporterError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

pub type WebResult<T> = Result<T, WebError>;
