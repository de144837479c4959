//! Gateway error types and HTTP response handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use holonet_core::HolonetError;

/// Gateway-specific errors with structured responses.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Unknown resource: {name}")]
    UnknownResource { name: String },

    #[error(transparent)]
    Pipeline(#[from] HolonetError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal gateway error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Structured error response returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl GatewayError {
    /// Get the error code string for the response.
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::UnknownResource { .. } => "NOT_FOUND",
            GatewayError::Pipeline(inner) => match inner {
                HolonetError::Unreachable { .. } | HolonetError::UpstreamStatus { .. } => {
                    "UPSTREAM_ERROR"
                }
                HolonetError::NotFound { .. } => "NOT_FOUND",
                HolonetError::InvalidSortField { .. } | HolonetError::InvalidParameter { .. } => {
                    "BAD_REQUEST"
                }
            },
            GatewayError::Config(_) => "CONFIG_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::UnknownResource { .. } => StatusCode::NOT_FOUND,
            GatewayError::Pipeline(inner) => match inner {
                // Both upstream failure kinds collapse into one generic 502.
                HolonetError::Unreachable { .. } | HolonetError::UpstreamStatus { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                HolonetError::NotFound { .. } => StatusCode::NOT_FOUND,
                HolonetError::InvalidSortField { .. } | HolonetError::InvalidParameter { .. } => {
                    StatusCode::BAD_REQUEST
                }
            },
            GatewayError::Config(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Create an error response with optional request ID.
    pub fn to_response(&self, request_id: Option<Uuid>) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
            request_id,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_response(None);

        (status, Json(body)).into_response()
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
