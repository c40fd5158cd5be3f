//! Role and permission orchestration.
//!
//! Every write that touches more than one row runs inside a single
//! [`RbacTransaction`], so callers observe either the whole effect or none
//! of it.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use shared::pagination::{Page, PageRequest};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    AdaptedPermission, AssignUserAccessRequest, CreatePermissionRequest, CreateRoleRequest,
    PermissionTree, RawPermission, Role, RoleFilter, RoleStatus, RoleSummary, UpdateRoleRequest,
    UserAccess,
};
use crate::store::{RbacStore, RbacTransaction};

use super::permission_adapter::{split_permission_name, PermissionAdapter};
use super::permission_tree::PermissionTreeBuilder;

fn record_mutation(operation: &'static str) {
    counter!("role_mutations_total", "operation" => operation).increment(1);
}

/// Service for roles, the permission catalog and user access.
#[derive(Clone)]
pub struct RoleService {
    store: Arc<dyn RbacStore>,
    tree_builder: PermissionTreeBuilder,
}

impl RoleService {
    /// Creates a service using the standard permission tables.
    pub fn new(store: Arc<dyn RbacStore>) -> Self {
        Self::with_tree_builder(store, PermissionTreeBuilder::default())
    }

    pub fn with_tree_builder(store: Arc<dyn RbacStore>, tree_builder: PermissionTreeBuilder) -> Self {
        Self {
            store,
            tree_builder,
        }
    }

    pub fn adapter(&self) -> &PermissionAdapter {
        self.tree_builder.adapter()
    }

    // ===========================================
    // Permission catalog
    // ===========================================

    pub async fn list_permissions(&self) -> DomainResult<Vec<RawPermission>> {
        self.store.list_permissions().await
    }

    /// Registers a permission. Names must have exactly three segments.
    pub async fn create_permission(
        &self,
        request: CreatePermissionRequest,
    ) -> DomainResult<RawPermission> {
        split_permission_name(&request.name)?;
        request.validate()?;

        if self
            .store
            .missing_permissions(std::slice::from_ref(&request.name))
            .await?
            .is_empty()
        {
            warn!(permission = %request.name, "Permission already exists");
            return Err(DomainError::Conflict(format!(
                "Permission already exists: {}",
                request.name
            )));
        }

        let permission = RawPermission {
            name: request.name,
            description: request.description,
        };
        self.store.insert_permission(&permission).await?;

        info!(permission = %permission.name, "Permission created");
        Ok(permission)
    }

    /// The catalog in four-segment form.
    pub async fn adapted_permissions(&self) -> DomainResult<Vec<AdaptedPermission>> {
        let raw = self.store.list_permissions().await?;
        self.adapter().adapt(&raw)
    }

    /// The whole catalog as a tree.
    pub async fn permission_tree(&self) -> DomainResult<PermissionTree> {
        let raw = self.store.list_permissions().await?;
        self.tree_builder.build_from_raw(&raw)
    }

    /// Converts names submitted by the UI back to stored names.
    pub fn reverse_adapt<S: AsRef<str>>(&self, names: &[S]) -> DomainResult<Vec<String>> {
        self.adapter().reverse_adapt(names)
    }

    // ===========================================
    // Roles
    // ===========================================

    pub async fn list_roles(&self, filter: &RoleFilter, page: PageRequest) -> DomainResult<Page<Role>> {
        self.store.list_roles(filter, page).await
    }

    pub async fn show_role(&self, id: Uuid) -> DomainResult<Role> {
        self.store
            .find_role(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Role", id))
    }

    pub async fn create_role(&self, request: CreateRoleRequest) -> DomainResult<Role> {
        request.validate()?;
        let name = request.name.trim().to_string();

        if self.store.find_role_by_name(&name).await?.is_some() {
            warn!(role = %name, "Role name already taken");
            return Err(DomainError::DuplicateRole(name));
        }
        let permissions = self.checked_permissions(&request.permissions).await?;

        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name,
            description: request.description,
            status: request.status,
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.store.begin().await?;
        tx.insert_role(&role).await.map_err(|e| duplicate_on_conflict(e, &role.name))?;
        replace_role_permissions(tx.as_mut(), role.id, &permissions).await?;
        tx.commit().await?;

        record_mutation("create");
        info!(role_id = %role.id, role = %role.name, permissions = permissions.len(), "Role created");
        self.show_role(role.id).await
    }

    /// Applies the fields present in `request`. A permission list, when
    /// given, replaces the current one in the same transaction.
    pub async fn update_role(&self, id: Uuid, request: UpdateRoleRequest) -> DomainResult<Role> {
        request.validate()?;
        let mut role = self.show_role(id).await?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if let Some(existing) = self.store.find_role_by_name(&name).await? {
                if existing.id != id {
                    warn!(role_id = %id, role = %name, "Role name already taken");
                    return Err(DomainError::DuplicateRole(name));
                }
            }
            role.name = name;
        }
        if request.description.is_some() {
            role.description = request.description;
        }
        if let Some(status) = request.status {
            role.status = status;
        }
        let permissions = match request.permissions {
            Some(names) => Some(self.checked_permissions(&names).await?),
            None => None,
        };
        role.updated_at = Utc::now();

        let mut tx = self.store.begin().await?;
        tx.update_role(&role).await.map_err(|e| duplicate_on_conflict(e, &role.name))?;
        if let Some(permissions) = &permissions {
            replace_role_permissions(tx.as_mut(), id, permissions).await?;
        }
        tx.commit().await?;

        record_mutation("update");
        info!(role_id = %id, "Role updated");
        self.show_role(id).await
    }

    /// Toggles a role's status without touching anything else.
    pub async fn set_role_status(&self, id: Uuid, status: RoleStatus) -> DomainResult<Role> {
        let mut role = self.show_role(id).await?;
        if role.status == status {
            return Ok(role);
        }
        role.status = status;
        role.updated_at = Utc::now();

        let mut tx = self.store.begin().await?;
        tx.update_role(&role).await?;
        tx.commit().await?;

        record_mutation("set_status");
        info!(role_id = %id, status = %status, "Role status changed");
        Ok(role)
    }

    /// Replaces the role's permission set as one unit.
    pub async fn assign_permissions_to_role(
        &self,
        id: Uuid,
        permission_names: &[String],
    ) -> DomainResult<Role> {
        let mut role = self.show_role(id).await?;
        let permissions = self.checked_permissions(permission_names).await?;
        role.updated_at = Utc::now();

        let mut tx = self.store.begin().await?;
        tx.update_role(&role).await?;
        replace_role_permissions(tx.as_mut(), id, &permissions).await?;
        tx.commit().await?;

        record_mutation("assign_permissions");
        info!(role_id = %id, permissions = permissions.len(), "Role permissions replaced");
        self.show_role(id).await
    }

    /// Deletes a role that no active user holds, together with its
    /// permission links and the links of soft-deleted users.
    pub async fn delete_role(&self, id: Uuid) -> DomainResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.lock_role(id).await? {
            return Err(DomainError::not_found("Role", id));
        }

        let users = tx.count_active_role_users(id).await?;
        if users > 0 {
            warn!(role_id = %id, users, "Refusing to delete role in use");
            return Err(DomainError::RoleInUse { role_id: id, users });
        }

        tx.clear_role_users(id).await?;
        tx.clear_role_permissions(id).await?;
        if !tx.delete_role(id).await? {
            return Err(DomainError::not_found("Role", id));
        }
        tx.commit().await?;

        record_mutation("delete");
        info!(role_id = %id, "Role deleted");
        Ok(())
    }

    // ===========================================
    // User access
    // ===========================================

    pub async fn user_access(&self, user_id: Uuid) -> DomainResult<UserAccess> {
        if !self.store.user_exists(user_id).await? {
            return Err(DomainError::not_found("User", user_id));
        }

        let roles = self.store.user_roles(user_id).await?;
        let permissions = self.store.user_permissions(user_id).await?;

        let effective: BTreeSet<String> = roles
            .iter()
            .filter(|role| role.status == RoleStatus::Active)
            .flat_map(|role| role.permissions.iter().cloned())
            .chain(permissions.iter().cloned())
            .collect();

        Ok(UserAccess {
            user_id,
            roles: roles.iter().map(RoleSummary::from).collect(),
            permissions,
            effective_permissions: effective.into_iter().collect(),
        })
    }

    /// Replaces the user's roles and direct permissions as one unit.
    pub async fn assign_roles_and_permissions_to_user(
        &self,
        user_id: Uuid,
        request: AssignUserAccessRequest,
    ) -> DomainResult<UserAccess> {
        if !self.store.user_exists(user_id).await? {
            return Err(DomainError::not_found("User", user_id));
        }

        let role_ids: Vec<Uuid> = request
            .roles
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if let Some(missing) = self.store.missing_roles(&role_ids).await?.first() {
            warn!(user_id = %user_id, role_id = %missing, "Unknown role in user assignment");
            return Err(DomainError::not_found("Role", missing));
        }
        let permissions = self.checked_permissions(&request.permissions).await?;

        let mut tx = self.store.begin().await?;
        tx.clear_user_roles(user_id).await?;
        for role_id in &role_ids {
            tx.attach_user_role(user_id, *role_id).await?;
        }
        tx.clear_user_permissions(user_id).await?;
        for permission in &permissions {
            tx.attach_user_permission(user_id, permission).await?;
        }
        tx.commit().await?;

        record_mutation("assign_user_access");
        info!(
            user_id = %user_id,
            roles = role_ids.len(),
            permissions = permissions.len(),
            "User access replaced"
        );
        self.user_access(user_id).await
    }

    /// The user's effective permissions as a tree.
    pub async fn user_permission_tree(&self, user_id: Uuid) -> DomainResult<PermissionTree> {
        let access = self.user_access(user_id).await?;
        let catalog = self.store.list_permissions().await?;

        let granted: Vec<RawPermission> = catalog
            .into_iter()
            .filter(|p| access.effective_permissions.binary_search(&p.name).is_ok())
            .collect();
        self.tree_builder.build_from_raw(&granted)
    }

    /// Whether the user holds `permission` directly or through an active role.
    pub async fn has_permission(&self, user_id: Uuid, permission: &str) -> DomainResult<bool> {
        let access = self.user_access(user_id).await?;
        Ok(access
            .effective_permissions
            .binary_search_by(|p| p.as_str().cmp(permission))
            .is_ok())
    }

    /// Sorted, de-duplicated names, each well-formed and present in the catalog.
    async fn checked_permissions(&self, names: &[String]) -> DomainResult<Vec<String>> {
        let names: Vec<String> = names
            .iter()
            .map(|n| n.trim().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for name in &names {
            split_permission_name(name)?;
        }

        let missing = self.store.missing_permissions(&names).await?;
        if !missing.is_empty() {
            warn!(permissions = ?missing, "Unknown permissions requested");
            return Err(DomainError::UnknownPermission(missing));
        }
        Ok(names)
    }
}

async fn replace_role_permissions(
    tx: &mut dyn RbacTransaction,
    role_id: Uuid,
    permissions: &[String],
) -> DomainResult<()> {
    tx.clear_role_permissions(role_id).await?;
    for permission in permissions {
        tx.attach_role_permission(role_id, permission).await?;
    }
    Ok(())
}

/// A unique-constraint hit on the role row means another request took the name first.
fn duplicate_on_conflict(error: DomainError, name: &str) -> DomainError {
    match error {
        DomainError::Conflict(_) => DomainError::DuplicateRole(name.to_string()),
        other => other,
    }
}
