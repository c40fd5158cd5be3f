//! Mapping of database errors onto domain errors.

use domain::DomainError;
use tracing::error;

/// PostgreSQL unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL foreign_key_violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Converts a `sqlx` error into the domain's error type.
pub fn db_error(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::RowNotFound => DomainError::NotFound {
            entity: "Row",
            id: String::new(),
        },
        sqlx::Error::Database(db)
            if matches!(
                db.code().as_deref(),
                Some(UNIQUE_VIOLATION) | Some(FOREIGN_KEY_VIOLATION)
            ) =>
        {
            DomainError::Conflict(db.message().to_string())
        }
        _ => {
            error!(error = %err, "Database error");
            DomainError::Storage(err.to_string())
        }
    }
}
