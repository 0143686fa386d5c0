//! Error types for the appointments service
//!
//! `ServiceError` is what the business layer reports; `ApiError` is its
//! HTTP rendering.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::repositories::RepositoryError;

/// Outcome of a rejected service operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// The caller does not own the entity
    #[error("{0}")]
    Forbidden(String),

    /// The entity is in the wrong state for the requested transition
    #[error("{0}")]
    Conflict(String),

    /// Persistence failure
    #[error("Repository error: {0}")]
    Internal(#[source] RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // Deleted by a concurrent request after the service read it
            RepositoryError::AppointmentGone(_) => Self::appointment_not_found(),
            other => Self::Internal(other),
        }
    }
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn appointment_not_found() -> Self {
        Self::NotFound("Appointment not found.".to_string())
    }

    pub fn user_not_found(user_id: i64) -> Self {
        Self::NotFound(format!("User with ID {} not found.", user_id))
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("You are not authorized to update this appointment.".to_string())
    }

    pub fn not_pending() -> Self {
        Self::Conflict("Appointment status is not 'Pending' and cannot be updated.".to_string())
    }

    pub fn not_canceled() -> Self {
        Self::Conflict("Appointment status is not 'Canceled' and cannot be deleted.".to_string())
    }

    pub fn canceled() -> Self {
        Self::Conflict("Appointment status is 'Canceled' and cannot be Approved.".to_string())
    }
}

/// Type alias for service results
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not allowed to act on the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource is in a conflicting state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Internal(e) => {
                tracing::error!("Repository failure: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(ServiceError::validation("bad")),
            ApiError::BadRequest(msg) if msg == "bad"
        ));
        assert!(matches!(
            ApiError::from(ServiceError::appointment_not_found()),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(ServiceError::forbidden()),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(ServiceError::canceled()),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(ServiceError::Internal(RepositoryError::Unavailable(
                "pool closed".to_string()
            ))),
            ApiError::InternalServerError
        ));
    }

    #[test]
    fn test_vanished_appointment_is_not_found() {
        let err = ServiceError::from(RepositoryError::AppointmentGone(4));
        assert!(matches!(err, ServiceError::NotFound(msg) if msg == "Appointment not found."));

        let err = ServiceError::from(RepositoryError::InvalidRecord("bad".to_string()));
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::InternalServerError, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
