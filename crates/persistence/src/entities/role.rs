//! Role entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for role_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "role_status", rename_all = "snake_case")]
pub enum RoleStatusDb {
    Active,
    Inactive,
}

impl From<RoleStatusDb> for domain::models::RoleStatus {
    fn from(db: RoleStatusDb) -> Self {
        match db {
            RoleStatusDb::Active => Self::Active,
            RoleStatusDb::Inactive => Self::Inactive,
        }
    }
}

impl From<domain::models::RoleStatus> for RoleStatusDb {
    fn from(domain: domain::models::RoleStatus) -> Self {
        match domain {
            domain::models::RoleStatus::Active => Self::Active,
            domain::models::RoleStatus::Inactive => Self::Inactive,
        }
    }
}

/// Role row joined with its aggregated permission names.
#[derive(Debug, Clone, FromRow)]
pub struct RoleEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: RoleStatusDb,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoleEntity> for domain::models::Role {
    fn from(entity: RoleEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            status: entity.status.into(),
            permissions: entity.permissions,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
