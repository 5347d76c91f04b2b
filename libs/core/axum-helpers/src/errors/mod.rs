pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "Request validation failed",
///   "details": { "price": [ ... ] }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier, see [`ErrorCode`]
    pub error: String,
    pub message: String,
    /// Structured details, e.g. per-field validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that renders as an [`ErrorResponse`].
///
/// Domain crates convert their own errors into this at the HTTP boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Explicit status and code, for domain errors that don't fit the variants above.
    #[error("{message}")]
    Custom {
        status: StatusCode,
        code: ErrorCode,
        message: String,
    },

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn custom(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Custom {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(e) => map_db_error(e).0,
            AppError::JsonExtractorRejection(JsonRejection::MissingJsonContentType(e)) => e.status(),
            AppError::JsonExtractorRejection(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) | AppError::UuidError(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Custom { status, .. } => *status,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::Database(ref e) => {
                let (_, code) = map_db_error(e);
                (code, code.default_message().to_string(), None)
            }
            AppError::JsonExtractorRejection(ref e) => (ErrorCode::InvalidJson, e.body_text(), None),
            AppError::ValidationError(ref e) => (
                ErrorCode::ValidationError,
                ErrorCode::ValidationError.default_message().to_string(),
                serde_json::to_value(e).ok(),
            ),
            AppError::UuidError(_) => (
                ErrorCode::InvalidUuid,
                ErrorCode::InvalidUuid.default_message().to_string(),
                None,
            ),
            AppError::BadRequest(ref msg) => (ErrorCode::BadRequest, msg.clone(), None),
            AppError::NotFound(ref msg) => (ErrorCode::NotFound, msg.clone(), None),
            AppError::Custom {
                code, ref message, ..
            } => (code, message.clone(), None),
            AppError::InternalServerError(_) => (
                ErrorCode::InternalError,
                ErrorCode::InternalError.default_message().to_string(),
                None,
            ),
            AppError::ServiceUnavailable(ref msg) => (ErrorCode::ServiceUnavailable, msg.clone(), None),
        };

        if status.is_server_error() {
            tracing::error!(error_code = code.code(), status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Pool and connection failures become 503 so callers can retry; everything else is a 500.
fn map_db_error(error: &DbErr) -> (StatusCode, ErrorCode) {
    match error {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::DatabaseUnavailable)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
    }
}

/// Build an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
