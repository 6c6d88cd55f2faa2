use thiserror::Error;

use crate::product::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(ValidationErrors),
    #[error("product {0} not found")]
    NotFound(i32),
    #[error("database error: {0}")]
    Db(String),
}

impl From<ValidationErrors> for ServiceError {
    fn from(e: ValidationErrors) -> Self { Self::Validation(e) }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::Validation(ValidationErrors::body(msg)),
            models::errors::ModelError::Db(msg) => Self::Db(msg),
        }
    }
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}
