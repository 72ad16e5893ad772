//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::views::ViewError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// View derivation failed (empty selection, invalid metric)
    #[error("{0}")]
    View(#[from] ViewError),

    /// Request body or query string could not be decoded
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    /// Describe a view error
    pub fn from_view_error(err: &ViewError) -> Self {
        Self {
            code: view_error_code(err).to_string(),
            message: err.to_string(),
        }
    }
}

/// Stable machine-readable code for a view error
pub fn view_error_code(err: &ViewError) -> &'static str {
    match err {
        ViewError::EmptySelection => "EMPTY_SELECTION",
        ViewError::InvalidMetric(_) => "INVALID_METRIC",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::View(e @ ViewError::EmptySelection) => {
                (StatusCode::UNPROCESSABLE_ENTITY, view_error_code(e))
            }
            ApiError::View(e @ ViewError::InvalidMetric(_)) => {
                (StatusCode::BAD_REQUEST, view_error_code(e))
            }
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InvalidMetric;

    #[test]
    fn test_status_codes() {
        let response = ApiError::from(ViewError::EmptySelection).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response =
            ApiError::from(ViewError::from(InvalidMetric("Active".to_string()))).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Validation("countries: expected a sequence".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_from_view_error() {
        let body = ErrorBody::from_view_error(&ViewError::EmptySelection);
        assert_eq!(body.code, "EMPTY_SELECTION");
        assert!(body.message.starts_with("Empty selection"));
    }
}
