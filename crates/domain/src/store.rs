//! Storage traits the domain services are written against.
//!
//! The persistence crate provides a PostgreSQL implementation and an
//! in-process one; the services never see which one they run on.

use shared::pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::error::DomainResult;
use crate::models::{RawPermission, Record, Resource, ResourceFilter, Role, RoleFilter};

/// Read access to permissions, roles and user assignments, plus the entry
/// point for transactional writes.
#[async_trait::async_trait]
pub trait RbacStore: Send + Sync {
    /// Catalog ordered by name.
    async fn list_permissions(&self) -> DomainResult<Vec<RawPermission>>;

    /// The entries of `names` that are not in the catalog, in input order.
    async fn missing_permissions(&self, names: &[String]) -> DomainResult<Vec<String>>;

    async fn insert_permission(&self, permission: &RawPermission) -> DomainResult<()>;

    /// Role with its permission names, sorted.
    async fn find_role(&self, id: Uuid) -> DomainResult<Option<Role>>;

    /// Case-insensitive lookup.
    async fn find_role_by_name(&self, name: &str) -> DomainResult<Option<Role>>;

    async fn list_roles(&self, filter: &RoleFilter, page: PageRequest) -> DomainResult<Page<Role>>;

    async fn user_exists(&self, user_id: Uuid) -> DomainResult<bool>;

    /// The entries of `ids` that do not name an existing role, in input order.
    async fn missing_roles(&self, ids: &[Uuid]) -> DomainResult<Vec<Uuid>>;

    /// Roles assigned to the user, ordered by name.
    async fn user_roles(&self, user_id: Uuid) -> DomainResult<Vec<Role>>;

    /// Permissions granted to the user directly, sorted.
    async fn user_permissions(&self, user_id: Uuid) -> DomainResult<Vec<String>>;

    /// Opens a transaction. Work done through it is invisible to other
    /// callers until [`RbacTransaction::commit`].
    async fn begin(&self) -> DomainResult<Box<dyn RbacTransaction>>;
}

/// Writes grouped into one all-or-nothing unit.
///
/// Dropping a transaction without committing it rolls it back.
#[async_trait::async_trait]
pub trait RbacTransaction: Send {
    /// Inserts the role row. `role.permissions` is ignored.
    async fn insert_role(&mut self, role: &Role) -> DomainResult<()>;

    /// Writes name, description, status and `updated_at`.
    async fn update_role(&mut self, role: &Role) -> DomainResult<()>;

    /// Locks the role row until the transaction ends, so no user can be
    /// assigned to it concurrently. Returns false when the role does not exist.
    async fn lock_role(&mut self, role_id: Uuid) -> DomainResult<bool>;

    /// Number of active users holding the role. Links of soft-deleted users
    /// are not counted.
    async fn count_active_role_users(&mut self, role_id: Uuid) -> DomainResult<u64>;

    /// Detaches the role from every user still linked to it.
    async fn clear_role_users(&mut self, role_id: Uuid) -> DomainResult<()>;

    /// Fails with `RoleInUse` while any user link remains.
    async fn delete_role(&mut self, role_id: Uuid) -> DomainResult<bool>;

    async fn clear_role_permissions(&mut self, role_id: Uuid) -> DomainResult<()>;

    async fn attach_role_permission(&mut self, role_id: Uuid, permission: &str) -> DomainResult<()>;

    async fn clear_user_roles(&mut self, user_id: Uuid) -> DomainResult<()>;

    async fn attach_user_role(&mut self, user_id: Uuid, role_id: Uuid) -> DomainResult<()>;

    async fn clear_user_permissions(&mut self, user_id: Uuid) -> DomainResult<()>;

    async fn attach_user_permission(&mut self, user_id: Uuid, permission: &str) -> DomainResult<()>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}

/// Document-style storage for one [`Resource`] type.
#[async_trait::async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn insert(&self, record: &Record<R>) -> DomainResult<()>;

    /// Finds a record regardless of its active flag.
    async fn find(&self, id: Uuid) -> DomainResult<Option<Record<R>>>;

    /// Overwrites data, flags and timestamps of an existing record.
    async fn update(&self, record: &Record<R>) -> DomainResult<()>;

    /// Removes the row. Returns false when nothing was removed.
    async fn remove(&self, id: Uuid) -> DomainResult<bool>;

    /// Filtered page, newest first.
    async fn list(&self, filter: &ResourceFilter, page: PageRequest) -> DomainResult<Page<Record<R>>>;
}
