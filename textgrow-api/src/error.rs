/// Error handling for the API server
///
/// A unified error type mapped to HTTP responses exactly once, at the
/// boundary. Handlers return `Result<T, ApiError>`; store and identity
/// failures convert into the matching variant rather than collapsing into a
/// single status.
///
/// # Status Mapping
///
/// | Variant | Status | Wire code |
/// |---|---|---|
/// | `BadRequest` | 400 | `bad_request` |
/// | `Unauthorized` | 401 | `unauthorized` |
/// | `NotFound` | 404 | `not_found` |
/// | `Conflict` | 409 | `conflict` |
/// | `ValidationError` | 422 | `validation_error` |
/// | `InternalError` | 500 | `internal_error` |
/// | `ServiceUnavailable` | 503 | `service_unavailable` |
///
/// Ownership failures surface as `NotFound`: a caller probing another user's
/// resource ids learns nothing beyond "no such resource".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use textgrow_shared::auth::provider::IdentityError;
use textgrow_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed input, capacity exceeded
    BadRequest(String),

    /// Unauthorized (401) - missing or rejected credential
    Unauthorized(String),

    /// Not found (404) - resource absent or not owned by the caller
    NotFound(String),

    /// Conflict (409) - uniqueness violated by a concurrent writer
    Conflict(String),

    /// Unprocessable entity (422) - per-field validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-parseable error code (e.g., "not_found", "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::CapacityExceeded(limit) => {
                ApiError::BadRequest(format!("maximum shortcut limit ({}) reached", limit))
            }
            StoreError::Backend(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert identity errors to API errors
///
/// Every verification failure, including an unreachable provider, is an
/// unauthenticated condition: the caller's credential could not be resolved.
impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

/// Convert validator errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Shortcut not found".to_string());
        assert_eq!(err.to_string(), "Not found: Shortcut not found");
    }

    #[test]
    fn test_capacity_maps_to_bad_request() {
        let err = ApiError::from(StoreError::CapacityExceeded(500));
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("500")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_identity_error_maps_to_unauthorized() {
        let err = ApiError::from(IdentityError::Unreachable("timeout".to_string()));
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_validation_error_display() {
        let errors = vec![
            ValidationErrorDetail {
                field: "trigger".to_string(),
                message: "Trigger is required".to_string(),
            },
            ValidationErrorDetail {
                field: "content".to_string(),
                message: "Content is required".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }
}
