//! Translation between stored and UI permission names.
//!
//! Stored names have three segments (`module.entity.action`). The UI groups
//! entities under sidebar sections, so it works with four segments
//! (`module.sidebar.entity.action`) where the sidebar is looked up from the
//! entity through [`PermissionTables`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DomainError, DomainResult};
use crate::models::{AdaptedPermission, RawPermission};

/// Which display-name table to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Module,
    Sidebar,
}

/// Lookup tables driving the adapter and the tree builder.
///
/// Built once at startup and shared; tests build their own.
#[derive(Debug, Clone, Default)]
pub struct PermissionTables {
    sidebar_groups: HashMap<String, String>,
    module_names: HashMap<String, String>,
    sidebar_names: HashMap<String, String>,
}

impl PermissionTables {
    /// Tables with no entries: every entity is its own sidebar group and every
    /// display name falls back to capitalization.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fixed tables used by the admin panel.
    pub fn standard() -> Self {
        Self::empty()
            .with_sidebar_group("profiles", &["roles", "users", "permissions"])
            .with_sidebar_group(
                "parametrization",
                &["countries", "departments", "cities", "establishments"],
            )
            .with_sidebar_group("marketing", &["campaigns"])
            .with_sidebar_group("dashboard", &["dashboard"])
            .with_sidebar_group("support", &["support"])
            .with_display_name(DisplayKind::Module, "admin", "Administrador")
            .with_display_name(DisplayKind::Module, "provider", "Proveedor")
            .with_display_name(DisplayKind::Module, "app", "Aplicación")
            .with_display_name(DisplayKind::Sidebar, "profiles", "Perfiles")
            .with_display_name(DisplayKind::Sidebar, "parametrization", "Parametrización")
            .with_display_name(DisplayKind::Sidebar, "marketing", "Marketing")
            .with_display_name(DisplayKind::Sidebar, "dashboard", "Dashboard")
            .with_display_name(DisplayKind::Sidebar, "support", "Soporte")
    }

    /// Maps every entity in `entities` to the sidebar group `group`.
    pub fn with_sidebar_group(mut self, group: &str, entities: &[&str]) -> Self {
        for entity in entities {
            self.sidebar_groups
                .insert((*entity).to_string(), group.to_string());
        }
        self
    }

    pub fn with_display_name(mut self, kind: DisplayKind, key: &str, name: &str) -> Self {
        let table = match kind {
            DisplayKind::Module => &mut self.module_names,
            DisplayKind::Sidebar => &mut self.sidebar_names,
        };
        table.insert(key.to_string(), name.to_string());
        self
    }
}

/// Splits a stored permission name into `(module, entity, action)`.
pub fn split_permission_name(name: &str) -> DomainResult<(&str, &str, &str)> {
    let mut parts = name.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(module), Some(entity), Some(action), None)
            if !module.is_empty() && !entity.is_empty() && !action.is_empty() =>
        {
            Ok((module, entity, action))
        }
        _ => Err(DomainError::MalformedPermissionName(name.to_string())),
    }
}

/// Uppercases the first character, leaving the rest untouched.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Stateless, table-driven permission name translator. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PermissionAdapter {
    tables: Arc<PermissionTables>,
}

impl Default for PermissionAdapter {
    fn default() -> Self {
        Self::new(PermissionTables::standard())
    }
}

impl PermissionAdapter {
    pub fn new(tables: PermissionTables) -> Self {
        Self {
            tables: Arc::new(tables),
        }
    }

    /// Sidebar group for an entity; the entity itself when unmapped.
    pub fn sidebar_group_for<'a>(&'a self, entity: &'a str) -> &'a str {
        self.tables
            .sidebar_groups
            .get(entity)
            .map(String::as_str)
            .unwrap_or(entity)
    }

    /// Display name for a module or sidebar key, capitalizing unknown keys.
    pub fn display_name(&self, kind: DisplayKind, key: &str) -> String {
        let table = match kind {
            DisplayKind::Module => &self.tables.module_names,
            DisplayKind::Sidebar => &self.tables.sidebar_names,
        };
        table
            .get(key)
            .cloned()
            .unwrap_or_else(|| capitalize(key))
    }

    pub fn adapt_one(&self, permission: &RawPermission) -> DomainResult<AdaptedPermission> {
        let (module, entity, action) = split_permission_name(&permission.name)?;
        let sidebar = self.sidebar_group_for(entity);

        Ok(AdaptedPermission {
            name: format!("{module}.{sidebar}.{entity}.{action}"),
            module: module.to_string(),
            sidebar: sidebar.to_string(),
            entity: entity.to_string(),
            action: action.to_string(),
            description: permission.description.clone(),
        })
    }

    /// Adapts every permission, preserving input order. Fails on the first
    /// malformed name.
    pub fn adapt(&self, permissions: &[RawPermission]) -> DomainResult<Vec<AdaptedPermission>> {
        permissions.iter().map(|p| self.adapt_one(p)).collect()
    }

    /// Drops the sidebar segment from four-segment names.
    pub fn reverse_adapt<S: AsRef<str>>(&self, names: &[S]) -> DomainResult<Vec<String>> {
        names.iter().map(|n| reverse_adapt_name(n.as_ref())).collect()
    }
}

fn reverse_adapt_name(name: &str) -> DomainResult<String> {
    let parts: Vec<&str> = name.split('.').collect();
    match parts.as_slice() {
        [module, _sidebar, entity, action]
            if !module.is_empty() && !entity.is_empty() && !action.is_empty() =>
        {
            Ok(format!("{module}.{entity}.{action}"))
        }
        _ => Err(DomainError::MalformedPermissionName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawPermission {
        RawPermission::new(name, None)
    }

    #[test]
    fn test_adapt_inserts_sidebar_group() {
        let adapter = PermissionAdapter::default();
        let adapted = adapter
            .adapt(&[
                raw("admin.roles.view"),
                raw("admin.users.edit"),
                raw("provider.campaigns.create"),
            ])
            .unwrap();

        let names: Vec<_> = adapted.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "admin.profiles.roles.view",
                "admin.profiles.users.edit",
                "provider.marketing.campaigns.create",
            ]
        );
        assert_eq!(adapted[2].module, "provider");
        assert_eq!(adapted[2].sidebar, "marketing");
        assert_eq!(adapted[2].entity, "campaigns");
        assert_eq!(adapted[2].action, "create");
    }

    #[test]
    fn test_adapt_carries_description() {
        let adapter = PermissionAdapter::default();
        let adapted = adapter
            .adapt_one(&RawPermission::new("admin.cities.delete", Some("Delete cities")))
            .unwrap();
        assert_eq!(adapted.name, "admin.parametrization.cities.delete");
        assert_eq!(adapted.description.as_deref(), Some("Delete cities"));
    }

    #[test]
    fn test_sidebar_group_identity_fallback() {
        let adapter = PermissionAdapter::default();
        for entity in ["commerces", "payout_methods", "neighborhoods", "x"] {
            assert_eq!(adapter.sidebar_group_for(entity), entity);
        }
        assert_eq!(adapter.sidebar_group_for("dashboard"), "dashboard");
        assert_eq!(adapter.sidebar_group_for("establishments"), "parametrization");
        assert_eq!(adapter.sidebar_group_for("permissions"), "profiles");
    }

    #[test]
    fn test_adapt_rejects_malformed_names() {
        let adapter = PermissionAdapter::default();
        for name in ["admin.roles", "admin", "", "admin..view", "a.b.c.d"] {
            let err = adapter.adapt_one(&raw(name)).unwrap_err();
            assert!(
                matches!(err, DomainError::MalformedPermissionName(ref n) if n == name),
                "{name:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_adapt_empty_input() {
        let adapter = PermissionAdapter::default();
        assert!(adapter.adapt(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_reverse_adapt_round_trip() {
        let adapter = PermissionAdapter::default();
        let names = [
            "admin.roles.view",
            "admin.departments.edit",
            "provider.campaigns.create",
            "app.support.open",
            "provider.commerces.update",
        ];
        for name in names {
            let adapted = adapter.adapt_one(&raw(name)).unwrap();
            assert_eq!(adapter.reverse_adapt(&[adapted.name]).unwrap(), vec![name]);
        }
    }

    #[test]
    fn test_reverse_adapt_rejects_three_segments() {
        let adapter = PermissionAdapter::default();
        let err = adapter.reverse_adapt(&["admin.roles.view"]).unwrap_err();
        assert!(matches!(err, DomainError::MalformedPermissionName(_)));
    }

    #[test]
    fn test_display_name_lookup_and_fallback() {
        let adapter = PermissionAdapter::default();
        assert_eq!(adapter.display_name(DisplayKind::Module, "admin"), "Administrador");
        assert_eq!(adapter.display_name(DisplayKind::Sidebar, "profiles"), "Perfiles");
        assert_eq!(adapter.display_name(DisplayKind::Module, "reports"), "Reports");
        assert_eq!(adapter.display_name(DisplayKind::Sidebar, "ñandú"), "Ñandú");
        assert_eq!(adapter.display_name(DisplayKind::Sidebar, ""), "");
    }

    #[test]
    fn test_custom_tables() {
        let tables = PermissionTables::empty()
            .with_sidebar_group("catalog", &["products"])
            .with_display_name(DisplayKind::Sidebar, "catalog", "Catálogo");
        let adapter = PermissionAdapter::new(tables);

        assert_eq!(adapter.sidebar_group_for("roles"), "roles");
        let adapted = adapter.adapt_one(&raw("provider.products.list")).unwrap();
        assert_eq!(adapted.name, "provider.catalog.products.list");
        assert_eq!(adapter.display_name(DisplayKind::Sidebar, "catalog"), "Catálogo");
    }

    #[test]
    fn test_split_permission_name() {
        assert_eq!(
            split_permission_name("admin.roles.view").unwrap(),
            ("admin", "roles", "view")
        );
        assert!(split_permission_name("admin.roles.view.extra").is_err());
    }
}
