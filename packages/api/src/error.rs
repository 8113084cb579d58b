// ABOUTME: API error type and its HTTP mapping
// ABOUTME: Storage and validation failures become envelope responses with matching status codes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, info};

use airwatch_core::ValidationError;
use airwatch_storage::StorageError;

use crate::response::ApiResponse;

/// Error returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("You do not have permission to perform this action".to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Storage(storage_error) => match storage_error {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                StorageError::Duplicate(_) => StatusCode::CONFLICT,
                StorageError::Invalid(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = %status, error = %message, "Request failed");
        } else {
            info!(status = %status, error = %message, "API error response");
        }

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::validation("bad"), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Unauthorized("no token".into()), StatusCode::UNAUTHORIZED)]
    #[case(ApiError::forbidden(), StatusCode::FORBIDDEN)]
    #[case(ApiError::Storage(StorageError::NotFound("Simulation")), StatusCode::NOT_FOUND)]
    #[case(ApiError::Storage(StorageError::Duplicate("name".into())), StatusCode::CONFLICT)]
    #[case(ApiError::Storage(StorageError::Invalid("nope".into())), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Storage(StorageError::Database("boom".into())), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] error: ApiError, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let error = ApiError::Storage(StorageError::NotFound("Simulation"));
        assert_eq!(error.to_string(), "Simulation not found");
    }

    #[test]
    fn test_validation_error_conversion() {
        let error: ApiError = ValidationError::Required("message").into();
        assert_eq!(error.to_string(), "message is required");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
