use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use service::product::validation::ValidationErrors;
use thiserror::Error;
use tracing::error;

pub const NOT_FOUND_MESSAGE: &str = "Product not found";

/// Errors a product handler can surface to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Product not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self { Self::Validation(e) }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errs) => Self::Validation(errs),
            ServiceError::NotFound(_) => Self::NotFound,
            ServiceError::Db(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "errors": errors }))).into_response()
            }
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": NOT_FOUND_MESSAGE }))).into_response()
            }
            ApiError::Internal(msg) => {
                // detail stays in the log
                error!(error = %msg, "product request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({ "error": "Internal Server Error" })))
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
