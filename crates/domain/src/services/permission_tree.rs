//! Folds adapted permissions into a [`PermissionTree`].

use crate::error::DomainResult;
use crate::models::{
    AdaptedPermission, EntityNode, ModuleNode, PermissionTree, RawPermission, SidebarNode,
};

use super::permission_adapter::{capitalize, DisplayKind, PermissionAdapter};

/// Builds permission trees, naming nodes through the adapter's display tables.
#[derive(Debug, Clone, Default)]
pub struct PermissionTreeBuilder {
    adapter: PermissionAdapter,
}

impl PermissionTreeBuilder {
    pub fn new(adapter: PermissionAdapter) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &PermissionAdapter {
        &self.adapter
    }

    /// Left fold over `adapted`. Nodes are created on first sight and reused
    /// afterwards; leaves are always appended, so duplicates stay duplicated.
    pub fn build(&self, adapted: &[AdaptedPermission]) -> PermissionTree {
        let mut tree = PermissionTree::default();
        for permission in adapted {
            self.insert(&mut tree, permission.clone());
        }
        tree
    }

    /// Adapts stored permissions and builds the tree in one step.
    pub fn build_from_raw(&self, raw: &[RawPermission]) -> DomainResult<PermissionTree> {
        let adapted = self.adapter.adapt(raw)?;
        Ok(self.build(&adapted))
    }

    fn insert(&self, tree: &mut PermissionTree, permission: AdaptedPermission) {
        let module = find_or_insert(
            &mut tree.modules,
            |m| m.key == permission.module,
            || ModuleNode {
                key: permission.module.clone(),
                name: self.adapter.display_name(DisplayKind::Module, &permission.module),
                sidebars: Vec::new(),
            },
        );
        let sidebar = find_or_insert(
            &mut module.sidebars,
            |s| s.key == permission.sidebar,
            || SidebarNode {
                key: permission.sidebar.clone(),
                name: self.adapter.display_name(DisplayKind::Sidebar, &permission.sidebar),
                entities: Vec::new(),
            },
        );
        let entity = find_or_insert(
            &mut sidebar.entities,
            |e| e.key == permission.entity,
            || EntityNode {
                key: permission.entity.clone(),
                name: capitalize(&permission.entity),
                permissions: Vec::new(),
            },
        );
        entity.permissions.push(permission);
    }
}

fn find_or_insert<T>(
    nodes: &mut Vec<T>,
    matches: impl Fn(&T) -> bool,
    create: impl FnOnce() -> T,
) -> &mut T {
    let index = match nodes.iter().position(matches) {
        Some(index) => index,
        None => {
            nodes.push(create());
            nodes.len() - 1
        }
    };
    &mut nodes[index]
}
