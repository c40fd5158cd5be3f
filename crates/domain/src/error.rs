//! Domain error types.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Role already exists: {0}")]
    DuplicateRole(String),

    #[error("Unknown permissions: {}", .0.join(", "))]
    UnknownPermission(Vec<String>),

    #[error("Role {role_id} is assigned to {users} user(s)")]
    RoleInUse { role_id: Uuid, users: u64 },

    #[error("Malformed permission name: {0:?}")]
    MalformedPermissionName(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// A validation error on one field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        DomainError::Validation {
            message: message.clone(),
            fields: vec![FieldError {
                field: field.into(),
                message,
            }],
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if fields.len() == 1 {
            fields[0].message.clone()
        } else {
            format!("{} validation errors", fields.len())
        };

        DomainError::Validation { message, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(length(max = 3, message = "Code is too long"))]
        code: String,
    }

    #[test]
    fn test_from_validation_errors_single_field() {
        let payload = Payload {
            name: String::new(),
            code: "CO".to_string(),
        };
        let err: DomainError = payload.validate().unwrap_err().into();
        match err {
            DomainError::Validation { message, fields } => {
                assert_eq!(message, "Name is required");
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "name");
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_from_validation_errors_multiple_fields() {
        let payload = Payload {
            name: String::new(),
            code: "COLO".to_string(),
        };
        let err: DomainError = payload.validate().unwrap_err().into();
        match err {
            DomainError::Validation { message, fields } => {
                assert_eq!(message, "2 validation errors");
                assert_eq!(fields[0].field, "code");
                assert_eq!(fields[1].field, "name");
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DomainError::UnknownPermission(vec!["a.b.c".into(), "d.e.f".into()]).to_string(),
            "Unknown permissions: a.b.c, d.e.f"
        );
        assert_eq!(
            DomainError::not_found("Role", "42").to_string(),
            "Role not found: 42"
        );
        assert_eq!(
            DomainError::MalformedPermissionName("admin.roles".into()).to_string(),
            "Malformed permission name: \"admin.roles\""
        );
    }
}
