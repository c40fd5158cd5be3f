use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, FieldError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Well-formed request the domain refuses (field errors, unknown or
    /// malformed permission names)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Body or query string that could not be parsed at all
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl ApiError {
    fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            ApiError::Validation { message, errors } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, errors)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = ErrorBody {
            status: "error",
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message, fields } => ApiError::Validation {
                message,
                errors: fields,
            },
            DomainError::MalformedPermissionName(_) | DomainError::UnknownPermission(_) => {
                ApiError::validation(err.to_string())
            }
            DomainError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DomainError::DuplicateRole(_)
            | DomainError::RoleInUse { .. }
            | DomainError::InvalidTransition { .. }
            | DomainError::Conflict(_) => ApiError::Conflict(err.to_string()),
            DomainError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_domain_error_status_codes() {
        assert_eq!(
            status_of(DomainError::not_found("Role", Uuid::nil())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::DuplicateRole("Admin".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::RoleInUse {
                role_id: Uuid::nil(),
                users: 2
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::InvalidTransition {
                from: "approved".into(),
                to: "pending".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::UnknownPermission(vec!["a.b.c".into()])),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::MalformedPermissionName("a.b".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::invalid_field("name", "Name is required")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::Storage("connection reset".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_keeps_field_errors() {
        match ApiError::from(DomainError::invalid_field("iso_code", "Invalid code")) {
            ApiError::Validation { message, errors } => {
                assert_eq!(message, "Invalid code");
                assert_eq!(errors[0].field, "iso_code");
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::NotFound("Role not found: 1".into()).to_string(),
            "Not found: Role not found: 1"
        );
        assert_eq!(
            ApiError::BadRequest("missing field".into()).to_string(),
            "Bad request: missing field"
        );
    }
}
