use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(Uuid),

    #[error("Option {option_id} not found for product {product_id}")]
    OptionNotFound { product_id: Uuid, option_id: Uuid },

    #[error("Cannot have a product option without a product (product {0} not found)")]
    InvalidRelationship(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Missing entities are reported as 400 Bad Request, keeping the `NOT_FOUND` error code.
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::NotFound(_) | ProductError::OptionNotFound { .. } => {
                AppError::custom(StatusCode::BAD_REQUEST, ErrorCode::NotFound, message)
            }
            ProductError::InvalidRelationship(_) => {
                AppError::custom(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, message)
            }
            ProductError::Validation(msg) => {
                AppError::custom(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, msg)
            }
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
