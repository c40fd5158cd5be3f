//! Generic resource row (JSONB document table).

use chrono::{DateTime, Utc};
use domain::models::{Record, Resource};
use domain::{DomainError, DomainResult};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping shared by every resource table.
#[derive(Debug, Clone, FromRow)]
pub struct RecordEntity {
    pub id: Uuid,
    pub data: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RecordEntity {
    /// Decodes the document into `R`. A document that no longer matches the
    /// model is reported as a storage error.
    pub fn into_record<R: Resource>(self) -> DomainResult<Record<R>> {
        let data = serde_json::from_value(self.data).map_err(|e| {
            DomainError::Storage(format!("Corrupt {} document {}: {}", R::KIND, self.id, e))
        })?;

        Ok(Record {
            id: self.id,
            data,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

/// Serializes a model into the JSONB document stored in `data`.
pub fn to_document<R: Resource>(data: &R) -> DomainResult<serde_json::Value> {
    serde_json::to_value(data)
        .map_err(|e| DomainError::Storage(format!("Cannot encode {}: {}", R::KIND, e)))
}
