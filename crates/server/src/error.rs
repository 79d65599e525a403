use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::error;
use models::conflict::Conflict;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// The colliding party of a conflict, or the offending value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<&Conflict> for ApiError {
    fn from(conflict: &Conflict) -> Self {
        let error = Self::new(conflict.code(), conflict.to_string());
        match conflict {
            Conflict::Teacher { classroom_name } => error.with_details(classroom_name),
            Conflict::Room { teacher_name } => error.with_details(teacher_name),
            Conflict::GroupTime => error,
        }
    }
}

/// Application error type for HTTP handlers
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// No bearer token subject
    Unauthorized,
    /// Authenticated, but not allowed to do this
    Forbidden(String),
    Internal(String),
    Service(ServiceError),
}

impl AppError {
    fn parts(self) -> (StatusCode, ApiError) {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", "authentication required"),
            ),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", msg)),
            Self::Internal(msg) => {
                error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", "internal server error"),
                )
            }
            Self::Service(err) => Self::service_parts(err),
        }
    }

    fn service_parts(err: ServiceError) -> (StatusCode, ApiError) {
        if err.is_serialization_failure() {
            error!("Concurrent schedule write aborted: {err}");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new(
                    "SERVICE_UNAVAILABLE",
                    "the schedule changed concurrently, please retry",
                ),
            );
        }

        match err {
            ServiceError::Conflict(conflict) => (StatusCode::CONFLICT, ApiError::from(&conflict)),
            ServiceError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                ApiError::new("NOT_FOUND", format!("{entity} not found")),
            ),
            ServiceError::InUse(entity) => (
                StatusCode::CONFLICT,
                ApiError::new(
                    "IN_USE",
                    format!("{entity} is still referenced and cannot be deleted"),
                ),
            ),
            ServiceError::MissingReference(entity) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new(
                    "MISSING_REFERENCE",
                    format!("{entity} refers to a record that does not exist"),
                ),
            ),
            ServiceError::Duplicate(detail) => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE", "a record with this value already exists")
                    .with_details(detail),
            ),
            ServiceError::Profile(detail) => (
                StatusCode::FORBIDDEN,
                ApiError::new("FORBIDDEN", "the account profile is incomplete").with_details(detail),
            ),
            ServiceError::Database(err) => {
                error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", "internal server error"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}
