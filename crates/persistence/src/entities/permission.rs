//! Permission entity (database row mapping).

use sqlx::FromRow;

/// Database row mapping for the permissions table.
#[derive(Debug, Clone, FromRow)]
pub struct PermissionEntity {
    pub name: String,
    pub description: Option<String>,
}

impl From<PermissionEntity> for domain::models::RawPermission {
    fn from(entity: PermissionEntity) -> Self {
        Self {
            name: entity.name,
            description: entity.description,
        }
    }
}
