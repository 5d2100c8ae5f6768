#![forbid(unsafe_code)]

use actix_web::http::StatusCode;
use tissue_storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    SchemaInvalid(String),
    #[error("{0}")]
    ConstraintViolation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    MethodNotAllowed(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SchemaInvalid(_) | Self::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Lines for the envelope's `errors` list: a short summary, then detail.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::SchemaInvalid(detail) => vec!["invalid json payload".to_string(), detail.clone()],
            Self::ConstraintViolation(detail) => {
                vec!["constraint violation".to_string(), detail.clone()]
            }
            Self::NotFound(detail) | Self::MethodNotAllowed(detail) => vec![detail.clone()],
            Self::PayloadTooLarge(detail) => vec!["payload too large".to_string(), detail.clone()],
            Self::Unexpected(detail) => {
                vec!["unexpected server error".to_string(), detail.clone()]
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::ConstraintViolation(message) => Self::ConstraintViolation(message),
            StoreError::NotFound(message) => Self::NotFound(message),
            other => Self::Unexpected(other.to_string()),
        }
    }
}
