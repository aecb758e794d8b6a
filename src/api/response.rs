//! Response types for the attendance API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Whether resubmitting (after refreshing state) may succeed.
    #[serde(default)]
    pub retryable: bool,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing identity error response.
    pub fn missing_identity(header: &str) -> Self {
        Self::with_details(
            "MISSING_IDENTITY",
            format!("missing or invalid header: {}", header),
            "Privileged operations require x-worker-id and x-worker-role from the identity gateway",
        )
    }

    fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let retryable = error.is_retryable();

        let (status, error) = match error {
            EngineError::OutsidePerimeter {
                distance_meters,
                radius_meters,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "OUTSIDE_PERIMETER",
                    message,
                    format!(
                        "{:.1}m outside the perimeter",
                        distance_meters - radius_meters
                    ),
                ),
            ),
            EngineError::AlreadyClockedIn { shift_id, .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "ALREADY_CLOCKED_IN",
                    message,
                    format!("Open shift: {}", shift_id),
                ),
            ),
            EngineError::NotClockedIn { .. } => {
                (StatusCode::CONFLICT, ApiError::new("NOT_CLOCKED_IN", message))
            }
            EngineError::DuplicateOpenShift { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_OPEN_SHIFT", message),
            ),
            EngineError::InvalidTimestamp { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_TIMESTAMP", message),
            ),
            EngineError::InvalidPerimeter { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIMETER", message),
            ),
            EngineError::InvalidLocation { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_LOCATION", message),
            ),
            EngineError::InvalidWorker { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_WORKER", message),
            ),
            EngineError::InvalidWindow { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_WINDOW", message),
            ),
            EngineError::Unauthorized { .. } => {
                (StatusCode::FORBIDDEN, ApiError::new("UNAUTHORIZED", message))
            }
            EngineError::StoreUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("STORE_UNAVAILABLE", message),
            ),
            EngineError::Timeout { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                ApiError::new("TIMEOUT", message),
            ),
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
        };

        ApiErrorResponse {
            status,
            error: error.retryable(retryable),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the service answers.
    pub status: String,
    /// Version of the active perimeter.
    pub perimeter_version: u64,
    /// Crate version of the running engine.
    pub engine_version: String,
}
