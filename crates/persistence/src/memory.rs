//! In-process implementation of the storage traits.
//!
//! Used as the `memory` storage backend for local development and as the
//! store behind the service and HTTP tests. RBAC transactions hold the state
//! lock for their whole lifetime and work on a copy that replaces the shared
//! state on commit, so they are serializable and a dropped transaction
//! leaves no trace.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use domain::models::{RawPermission, Record, Resource, ResourceFilter, Role, RoleFilter};
use domain::store::{RbacStore, RbacTransaction, ResourceStore};
use domain::{DomainError, DomainResult};
use serde_json::Value;
use shared::pagination::{Page, PageRequest};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::entities::record::to_document;
use crate::seed;

const NO_FAULT: usize = usize::MAX;

/// Table holding the users checked by [`RbacStore::user_exists`].
const USERS_TABLE: &str = "users";

#[derive(Debug, Clone, Default)]
struct RbacState {
    permissions: BTreeMap<String, Option<String>>,
    /// Role rows; `permissions` is filled in from `role_permissions` on read
    roles: HashMap<Uuid, Role>,
    role_permissions: BTreeSet<(Uuid, String)>,
    user_roles: BTreeSet<(Uuid, Uuid)>,
    user_permissions: BTreeSet<(Uuid, String)>,
}

impl RbacState {
    fn role(&self, id: Uuid) -> Option<Role> {
        self.roles.get(&id).map(|role| self.with_permissions(role))
    }

    fn with_permissions(&self, role: &Role) -> Role {
        let id = role.id;
        let mut role = role.clone();
        role.permissions = self
            .role_permissions
            .iter()
            .filter(|(role_id, _)| *role_id == id)
            .map(|(_, name)| name.clone())
            .collect();
        role
    }

    fn name_taken(&self, name: &str, except: Uuid) -> bool {
        let name = name.to_lowercase();
        self.roles
            .values()
            .any(|role| role.id != except && role.name.to_lowercase() == name)
    }
}

type Documents = HashMap<&'static str, BTreeMap<Uuid, Record<Value>>>;

struct Inner {
    rbac: Arc<Mutex<RbacState>>,
    documents: RwLock<Documents>,
    permission_link_fault: AtomicUsize,
    user_link_fault: AtomicUsize,
}

/// Shared in-process store. Clones share the same data.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_permissions(Vec::new())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose catalog holds the default permissions.
    pub fn seeded() -> Self {
        Self::with_permissions(seed::default_permissions())
    }

    pub fn with_permissions(permissions: Vec<RawPermission>) -> Self {
        let state = RbacState {
            permissions: permissions
                .into_iter()
                .map(|p| (p.name, p.description))
                .collect(),
            ..Default::default()
        };

        Self {
            inner: Arc::new(Inner {
                rbac: Arc::new(Mutex::new(state)),
                documents: RwLock::new(HashMap::new()),
                permission_link_fault: AtomicUsize::new(NO_FAULT),
                user_link_fault: AtomicUsize::new(NO_FAULT),
            }),
        }
    }

    /// Makes the next transaction fail on its role-permission link insert
    /// number `succeeding + 1`.
    pub fn fail_permission_link_after(&self, succeeding: usize) {
        self.inner.permission_link_fault.store(succeeding, Ordering::SeqCst);
    }

    /// Makes the next transaction fail on its user link insert (role or
    /// direct permission) number `succeeding + 1`.
    pub fn fail_user_link_after(&self, succeeding: usize) {
        self.inner.user_link_fault.store(succeeding, Ordering::SeqCst);
    }

    async fn active_users(&self) -> BTreeSet<Uuid> {
        let documents = self.inner.documents.read().await;
        documents
            .get(USERS_TABLE)
            .map(|table| {
                table
                    .values()
                    .filter(|record| record.is_active)
                    .map(|record| record.id)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn take_fault(fault: &AtomicUsize) -> Option<usize> {
    match fault.swap(NO_FAULT, Ordering::SeqCst) {
        NO_FAULT => None,
        n => Some(n),
    }
}

/// Counts down an injected fault, failing once it reaches zero.
fn countdown(remaining: &mut Option<usize>, what: &str) -> DomainResult<()> {
    match remaining {
        Some(0) => Err(DomainError::Storage(format!("injected failure on {what} insert"))),
        Some(n) => {
            *n -= 1;
            Ok(())
        }
        None => Ok(()),
    }
}

#[async_trait::async_trait]
impl RbacStore for MemoryStore {
    async fn list_permissions(&self) -> DomainResult<Vec<RawPermission>> {
        let state = self.inner.rbac.lock().await;
        Ok(state
            .permissions
            .iter()
            .map(|(name, description)| RawPermission {
                name: name.clone(),
                description: description.clone(),
            })
            .collect())
    }

    async fn missing_permissions(&self, names: &[String]) -> DomainResult<Vec<String>> {
        let state = self.inner.rbac.lock().await;
        Ok(names
            .iter()
            .filter(|name| !state.permissions.contains_key(*name))
            .cloned()
            .collect())
    }

    async fn insert_permission(&self, permission: &RawPermission) -> DomainResult<()> {
        let mut state = self.inner.rbac.lock().await;
        if state.permissions.contains_key(&permission.name) {
            return Err(DomainError::Conflict(format!(
                "permissions.name {} already exists",
                permission.name
            )));
        }
        state
            .permissions
            .insert(permission.name.clone(), permission.description.clone());
        Ok(())
    }

    async fn find_role(&self, id: Uuid) -> DomainResult<Option<Role>> {
        Ok(self.inner.rbac.lock().await.role(id))
    }

    async fn find_role_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        let state = self.inner.rbac.lock().await;
        let name = name.to_lowercase();
        Ok(state
            .roles
            .values()
            .find(|role| role.name.to_lowercase() == name)
            .map(|role| state.with_permissions(role)))
    }

    async fn list_roles(&self, filter: &RoleFilter, page: PageRequest) -> DomainResult<Page<Role>> {
        let state = self.inner.rbac.lock().await;
        let mut roles: Vec<Role> = state
            .roles
            .values()
            .filter(|role| filter.matches(role))
            .map(|role| state.with_permissions(role))
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Page::from_vec(roles, page))
    }

    async fn user_exists(&self, user_id: Uuid) -> DomainResult<bool> {
        let documents = self.inner.documents.read().await;
        Ok(documents
            .get(USERS_TABLE)
            .and_then(|table| table.get(&user_id))
            .is_some_and(|record| record.is_active))
    }

    async fn missing_roles(&self, ids: &[Uuid]) -> DomainResult<Vec<Uuid>> {
        let state = self.inner.rbac.lock().await;
        Ok(ids
            .iter()
            .filter(|id| !state.roles.contains_key(*id))
            .copied()
            .collect())
    }

    async fn user_roles(&self, user_id: Uuid) -> DomainResult<Vec<Role>> {
        let state = self.inner.rbac.lock().await;
        let mut roles: Vec<Role> = state
            .user_roles
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, role_id)| state.role(*role_id))
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn user_permissions(&self, user_id: Uuid) -> DomainResult<Vec<String>> {
        let state = self.inner.rbac.lock().await;
        Ok(state
            .user_permissions
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, name)| name.clone())
            .collect())
    }

    async fn begin(&self) -> DomainResult<Box<dyn RbacTransaction>> {
        let active_users = self.active_users().await;
        let guard = Arc::clone(&self.inner.rbac).lock_owned().await;
        let working = guard.clone();

        Ok(Box::new(MemoryTransaction {
            guard,
            working,
            active_users,
            permission_links_before_fault: take_fault(&self.inner.permission_link_fault),
            user_links_before_fault: take_fault(&self.inner.user_link_fault),
        }))
    }
}

/// Transaction over [`MemoryStore`]'s RBAC state.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<RbacState>,
    working: RbacState,
    /// Users that were active when the transaction began
    active_users: BTreeSet<Uuid>,
    permission_links_before_fault: Option<usize>,
    user_links_before_fault: Option<usize>,
}

impl MemoryTransaction {
    fn require_permission(&self, permission: &str) -> DomainResult<()> {
        if self.working.permissions.contains_key(permission) {
            Ok(())
        } else {
            Err(DomainError::Storage(format!(
                "foreign key violation: permission {permission} does not exist"
            )))
        }
    }

    fn require_role(&self, role_id: Uuid) -> DomainResult<()> {
        if self.working.roles.contains_key(&role_id) {
            Ok(())
        } else {
            Err(DomainError::Storage(format!(
                "foreign key violation: role {role_id} does not exist"
            )))
        }
    }
}

#[async_trait::async_trait]
impl RbacTransaction for MemoryTransaction {
    async fn insert_role(&mut self, role: &Role) -> DomainResult<()> {
        if self.working.roles.contains_key(&role.id) || self.working.name_taken(&role.name, role.id) {
            return Err(DomainError::Conflict(format!(
                "roles.name {} already exists",
                role.name
            )));
        }
        let mut row = role.clone();
        row.permissions.clear();
        self.working.roles.insert(row.id, row);
        Ok(())
    }

    async fn update_role(&mut self, role: &Role) -> DomainResult<()> {
        if self.working.name_taken(&role.name, role.id) {
            return Err(DomainError::Conflict(format!(
                "roles.name {} already exists",
                role.name
            )));
        }
        let row = self
            .working
            .roles
            .get_mut(&role.id)
            .ok_or_else(|| DomainError::not_found("Role", role.id))?;
        row.name = role.name.clone();
        row.description = role.description.clone();
        row.status = role.status;
        row.updated_at = role.updated_at;
        Ok(())
    }

    async fn lock_role(&mut self, role_id: Uuid) -> DomainResult<bool> {
        // The whole state is already locked for the transaction's lifetime
        Ok(self.working.roles.contains_key(&role_id))
    }

    async fn count_active_role_users(&mut self, role_id: Uuid) -> DomainResult<u64> {
        Ok(self
            .working
            .user_roles
            .iter()
            .filter(|(user_id, id)| *id == role_id && self.active_users.contains(user_id))
            .count() as u64)
    }

    async fn clear_role_users(&mut self, role_id: Uuid) -> DomainResult<()> {
        self.working.user_roles.retain(|(_, id)| *id != role_id);
        Ok(())
    }

    async fn delete_role(&mut self, role_id: Uuid) -> DomainResult<bool> {
        let users = self
            .working
            .user_roles
            .iter()
            .filter(|(_, id)| *id == role_id)
            .count() as u64;
        if users > 0 {
            return Err(DomainError::RoleInUse { role_id, users });
        }
        self.working
            .role_permissions
            .retain(|(id, _)| *id != role_id);
        Ok(self.working.roles.remove(&role_id).is_some())
    }

    async fn clear_role_permissions(&mut self, role_id: Uuid) -> DomainResult<()> {
        self.working
            .role_permissions
            .retain(|(id, _)| *id != role_id);
        Ok(())
    }

    async fn attach_role_permission(&mut self, role_id: Uuid, permission: &str) -> DomainResult<()> {
        countdown(&mut self.permission_links_before_fault, "role permission")?;
        self.require_role(role_id)?;
        self.require_permission(permission)?;
        if !self
            .working
            .role_permissions
            .insert((role_id, permission.to_string()))
        {
            return Err(DomainError::Conflict(format!(
                "role_permissions ({role_id}, {permission}) already exists"
            )));
        }
        Ok(())
    }

    async fn clear_user_roles(&mut self, user_id: Uuid) -> DomainResult<()> {
        self.working.user_roles.retain(|(id, _)| *id != user_id);
        Ok(())
    }

    async fn attach_user_role(&mut self, user_id: Uuid, role_id: Uuid) -> DomainResult<()> {
        countdown(&mut self.user_links_before_fault, "user role")?;
        self.require_role(role_id)?;
        self.working.user_roles.insert((user_id, role_id));
        Ok(())
    }

    async fn clear_user_permissions(&mut self, user_id: Uuid) -> DomainResult<()> {
        self.working.user_permissions.retain(|(id, _)| *id != user_id);
        Ok(())
    }

    async fn attach_user_permission(&mut self, user_id: Uuid, permission: &str) -> DomainResult<()> {
        countdown(&mut self.user_links_before_fault, "user permission")?;
        self.require_permission(permission)?;
        self.working
            .user_permissions
            .insert((user_id, permission.to_string()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let MemoryTransaction {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

fn decode<R: Resource>(record: &Record<Value>) -> DomainResult<Record<R>> {
    let data = serde_json::from_value(record.data.clone()).map_err(|e| {
        DomainError::Storage(format!("Corrupt {} document {}: {}", R::KIND, record.id, e))
    })?;

    Ok(Record {
        id: record.id,
        data,
        is_active: record.is_active,
        created_at: record.created_at,
        updated_at: record.updated_at,
        deleted_at: record.deleted_at,
    })
}

fn encode<R: Resource>(record: &Record<R>) -> DomainResult<Record<Value>> {
    Ok(Record {
        id: record.id,
        data: to_document(&record.data)?,
        is_active: record.is_active,
        created_at: record.created_at,
        updated_at: record.updated_at,
        deleted_at: record.deleted_at,
    })
}

#[async_trait::async_trait]
impl<R: Resource> ResourceStore<R> for MemoryStore {
    async fn insert(&self, record: &Record<R>) -> DomainResult<()> {
        let stored = encode(record)?;
        let mut documents = self.inner.documents.write().await;
        let table = documents.entry(R::TABLE).or_default();
        if table.contains_key(&record.id) {
            return Err(DomainError::Conflict(format!(
                "{}.id {} already exists",
                R::TABLE,
                record.id
            )));
        }
        table.insert(record.id, stored);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<Record<R>>> {
        let documents = self.inner.documents.read().await;
        documents
            .get(R::TABLE)
            .and_then(|table| table.get(&id))
            .map(decode)
            .transpose()
    }

    async fn update(&self, record: &Record<R>) -> DomainResult<()> {
        let stored = encode(record)?;
        let mut documents = self.inner.documents.write().await;
        let slot = documents
            .get_mut(R::TABLE)
            .and_then(|table| table.get_mut(&record.id))
            .ok_or_else(|| DomainError::not_found(R::KIND, record.id))?;
        *slot = stored;
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> DomainResult<bool> {
        let mut documents = self.inner.documents.write().await;
        Ok(documents
            .get_mut(R::TABLE)
            .and_then(|table| table.remove(&id))
            .is_some())
    }

    async fn list(&self, filter: &ResourceFilter, page: PageRequest) -> DomainResult<Page<Record<R>>> {
        let documents = self.inner.documents.read().await;
        let mut matching: Vec<&Record<Value>> = documents
            .get(R::TABLE)
            .map(|table| {
                table
                    .values()
                    .filter(|record| filter.matches(record.is_active, &record.data))
                    .collect()
            })
            .unwrap_or_default();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let records = matching
            .into_iter()
            .map(decode)
            .collect::<DomainResult<Vec<Record<R>>>>()?;
        Ok(Page::from_vec(records, page))
    }
}
