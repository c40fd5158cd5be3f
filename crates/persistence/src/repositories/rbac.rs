//! Role and permission repository for database operations.

use domain::models::{RawPermission, Role, RoleFilter};
use domain::store::{RbacStore, RbacTransaction};
use domain::{DomainError, DomainResult};
use shared::pagination::{Page, PageRequest};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::permission::PermissionEntity;
use crate::entities::role::{RoleEntity, RoleStatusDb};
use crate::metrics::QueryTimer;

use super::escape_like;

const ROLE_COLUMNS: &str = r#"
    r.id, r.name, r.description, r.status, r.created_at, r.updated_at,
    ARRAY(
        SELECT rp.permission_name FROM role_permissions rp
        WHERE rp.role_id = r.id
        ORDER BY rp.permission_name
    ) AS permissions
"#;

/// PostgreSQL implementation of [`RbacStore`].
#[derive(Clone)]
pub struct PgRbacStore {
    pool: PgPool,
}

impl PgRbacStore {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RbacStore for PgRbacStore {
    async fn list_permissions(&self) -> DomainResult<Vec<RawPermission>> {
        let timer = QueryTimer::new("permissions", "list");
        let entities = timer.finish(
            sqlx::query_as::<_, PermissionEntity>(
                "SELECT name, description FROM permissions ORDER BY name",
            )
            .fetch_all(&self.pool)
            .await,
        )?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn missing_permissions(&self, names: &[String]) -> DomainResult<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("permissions", "missing");
        timer.finish(
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT t.name
                FROM UNNEST($1::text[]) WITH ORDINALITY AS t(name, ord)
                WHERE NOT EXISTS (SELECT 1 FROM permissions p WHERE p.name = t.name)
                ORDER BY t.ord
                "#,
            )
            .bind(names)
            .fetch_all(&self.pool)
            .await,
        )
    }

    async fn insert_permission(&self, permission: &RawPermission) -> DomainResult<()> {
        let timer = QueryTimer::new("permissions", "insert");
        timer.finish(
            sqlx::query("INSERT INTO permissions (name, description) VALUES ($1, $2)")
                .bind(&permission.name)
                .bind(&permission.description)
                .execute(&self.pool)
                .await,
        )?;
        Ok(())
    }

    async fn find_role(&self, id: Uuid) -> DomainResult<Option<Role>> {
        let timer = QueryTimer::new("roles", "find");
        let entity = timer.finish(
            sqlx::query_as::<_, RoleEntity>(&format!(
                "SELECT {ROLE_COLUMNS} FROM roles r WHERE r.id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await,
        )?;

        Ok(entity.map(Into::into))
    }

    async fn find_role_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        let timer = QueryTimer::new("roles", "find_by_name");
        let entity = timer.finish(
            sqlx::query_as::<_, RoleEntity>(&format!(
                "SELECT {ROLE_COLUMNS} FROM roles r WHERE LOWER(r.name) = LOWER($1)"
            ))
            .bind(name)
            .fetch_optional(&self.pool)
            .await,
        )?;

        Ok(entity.map(Into::into))
    }

    async fn list_roles(&self, filter: &RoleFilter, page: PageRequest) -> DomainResult<Page<Role>> {
        let name_pattern = filter
            .name
            .as_deref()
            .map(|name| format!("%{}%", escape_like(name)));
        let status = filter.status.map(RoleStatusDb::from);

        let timer = QueryTimer::new("roles", "count");
        let total: i64 = timer.finish(
            sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM roles r
                WHERE ($1::text IS NULL OR r.name ILIKE $1)
                  AND ($2::role_status IS NULL OR r.status = $2)
                "#,
            )
            .bind(&name_pattern)
            .bind(status)
            .fetch_one(&self.pool)
            .await,
        )?;

        let timer = QueryTimer::new("roles", "list");
        let entities = timer.finish(
            sqlx::query_as::<_, RoleEntity>(&format!(
                r#"
                SELECT {ROLE_COLUMNS} FROM roles r
                WHERE ($1::text IS NULL OR r.name ILIKE $1)
                  AND ($2::role_status IS NULL OR r.status = $2)
                ORDER BY r.name
                LIMIT $3 OFFSET $4
                "#
            ))
            .bind(&name_pattern)
            .bind(status)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await,
        )?;

        let roles = entities.into_iter().map(Into::into).collect();
        Ok(Page::new(roles, page, total.max(0) as u64))
    }

    async fn user_exists(&self, user_id: Uuid) -> DomainResult<bool> {
        let timer = QueryTimer::new("users", "exists");
        timer.finish(
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND is_active = TRUE)",
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await,
        )
    }

    async fn missing_roles(&self, ids: &[Uuid]) -> DomainResult<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("roles", "missing");
        timer.finish(
            sqlx::query_scalar::<_, Uuid>(
                r#"
                SELECT t.id
                FROM UNNEST($1::uuid[]) WITH ORDINALITY AS t(id, ord)
                WHERE NOT EXISTS (SELECT 1 FROM roles r WHERE r.id = t.id)
                ORDER BY t.ord
                "#,
            )
            .bind(ids)
            .fetch_all(&self.pool)
            .await,
        )
    }

    async fn user_roles(&self, user_id: Uuid) -> DomainResult<Vec<Role>> {
        let timer = QueryTimer::new("user_roles", "list");
        let entities = timer.finish(
            sqlx::query_as::<_, RoleEntity>(&format!(
                r#"
                SELECT {ROLE_COLUMNS} FROM roles r
                JOIN user_roles ur ON ur.role_id = r.id
                WHERE ur.user_id = $1
                ORDER BY r.name
                "#
            ))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await,
        )?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn user_permissions(&self, user_id: Uuid) -> DomainResult<Vec<String>> {
        let timer = QueryTimer::new("user_permissions", "list");
        timer.finish(
            sqlx::query_scalar(
                r#"
                SELECT permission_name FROM user_permissions
                WHERE user_id = $1
                ORDER BY permission_name
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await,
        )
    }

    async fn begin(&self) -> DomainResult<Box<dyn RbacTransaction>> {
        let timer = QueryTimer::new("roles", "begin");
        let tx = timer.finish(self.pool.begin().await)?;
        Ok(Box::new(PgRbacTransaction { tx }))
    }
}

/// A database transaction. `sqlx` rolls it back on drop.
pub struct PgRbacTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait::async_trait]
impl RbacTransaction for PgRbacTransaction {
    async fn insert_role(&mut self, role: &Role) -> DomainResult<()> {
        let timer = QueryTimer::new("roles", "insert");
        timer.finish(
            sqlx::query(
                r#"
                INSERT INTO roles (id, name, description, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(role.id)
            .bind(&role.name)
            .bind(&role.description)
            .bind(RoleStatusDb::from(role.status))
            .bind(role.created_at)
            .bind(role.updated_at)
            .execute(&mut *self.tx)
            .await,
        )?;
        Ok(())
    }

    async fn update_role(&mut self, role: &Role) -> DomainResult<()> {
        let timer = QueryTimer::new("roles", "update");
        timer.finish(
            sqlx::query(
                r#"
                UPDATE roles
                SET name = $2, description = $3, status = $4, updated_at = $5
                WHERE id = $1
                "#,
            )
            .bind(role.id)
            .bind(&role.name)
            .bind(&role.description)
            .bind(RoleStatusDb::from(role.status))
            .bind(role.updated_at)
            .execute(&mut *self.tx)
            .await,
        )?;
        Ok(())
    }

    async fn lock_role(&mut self, role_id: Uuid) -> DomainResult<bool> {
        // FOR UPDATE conflicts with the key-share lock a user_roles insert takes
        let timer = QueryTimer::new("roles", "lock");
        let row: Option<Uuid> = timer.finish(
            sqlx::query_scalar("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
                .bind(role_id)
                .fetch_optional(&mut *self.tx)
                .await,
        )?;
        Ok(row.is_some())
    }

    async fn count_active_role_users(&mut self, role_id: Uuid) -> DomainResult<u64> {
        let timer = QueryTimer::new("user_roles", "count");
        let count: i64 = timer.finish(
            sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM user_roles ur
                JOIN users u ON u.id = ur.user_id
                WHERE ur.role_id = $1 AND u.is_active = TRUE
                "#,
            )
            .bind(role_id)
            .fetch_one(&mut *self.tx)
            .await,
        )?;
        Ok(count.max(0) as u64)
    }

    async fn clear_role_users(&mut self, role_id: Uuid) -> DomainResult<()> {
        let timer = QueryTimer::new("user_roles", "clear_role");
        timer.finish(
            sqlx::query("DELETE FROM user_roles WHERE role_id = $1")
                .bind(role_id)
                .execute(&mut *self.tx)
                .await,
        )?;
        Ok(())
    }

    async fn delete_role(&mut self, role_id: Uuid) -> DomainResult<bool> {
        let timer = QueryTimer::new("roles", "delete");
        let result = timer.finish(
            sqlx::query("DELETE FROM roles WHERE id = $1")
                .bind(role_id)
                .execute(&mut *self.tx)
                .await,
        );

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            // Only the user_roles foreign key can refuse this delete
            Err(DomainError::Conflict(_)) => Err(DomainError::RoleInUse { role_id, users: 1 }),
            Err(err) => Err(err),
        }
    }

    async fn clear_role_permissions(&mut self, role_id: Uuid) -> DomainResult<()> {
        let timer = QueryTimer::new("role_permissions", "clear");
        timer.finish(
            sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
                .bind(role_id)
                .execute(&mut *self.tx)
                .await,
        )?;
        Ok(())
    }

    async fn attach_role_permission(&mut self, role_id: Uuid, permission: &str) -> DomainResult<()> {
        let timer = QueryTimer::new("role_permissions", "insert");
        timer.finish(
            sqlx::query("INSERT INTO role_permissions (role_id, permission_name) VALUES ($1, $2)")
                .bind(role_id)
                .bind(permission)
                .execute(&mut *self.tx)
                .await,
        )?;
        Ok(())
    }

    async fn clear_user_roles(&mut self, user_id: Uuid) -> DomainResult<()> {
        let timer = QueryTimer::new("user_roles", "clear");
        timer.finish(
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *self.tx)
                .await,
        )?;
        Ok(())
    }

    async fn attach_user_role(&mut self, user_id: Uuid, role_id: Uuid) -> DomainResult<()> {
        let timer = QueryTimer::new("user_roles", "insert");
        timer.finish(
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(role_id)
                .execute(&mut *self.tx)
                .await,
        )?;
        Ok(())
    }

    async fn clear_user_permissions(&mut self, user_id: Uuid) -> DomainResult<()> {
        let timer = QueryTimer::new("user_permissions", "clear");
        timer.finish(
            sqlx::query("DELETE FROM user_permissions WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *self.tx)
                .await,
        )?;
        Ok(())
    }

    async fn attach_user_permission(&mut self, user_id: Uuid, permission: &str) -> DomainResult<()> {
        let timer = QueryTimer::new("user_permissions", "insert");
        timer.finish(
            sqlx::query("INSERT INTO user_permissions (user_id, permission_name) VALUES ($1, $2)")
                .bind(user_id)
                .bind(permission)
                .execute(&mut *self.tx)
                .await,
        )?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let timer = QueryTimer::new("roles", "commit");
        timer.finish(self.tx.commit().await)
    }
}
