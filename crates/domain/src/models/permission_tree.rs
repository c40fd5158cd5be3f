//! Permission tree: module → sidebar group → entity → permissions.
//!
//! Each level has its own node type, so traversal never has to ask whether a
//! node carries children or permissions. Children are kept in insertion order
//! and serialize as JSON objects keyed by segment.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use super::permission::AdaptedPermission;

/// Level tag emitted with every serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLevel {
    Module,
    Sidebar,
    Entity,
}

/// Leaf-bearing node. The action level lives on the permissions themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    pub key: String,
    pub name: String,
    pub permissions: Vec<AdaptedPermission>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarNode {
    pub key: String,
    pub name: String,
    pub entities: Vec<EntityNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    pub key: String,
    pub name: String,
    pub sidebars: Vec<SidebarNode>,
}

/// A borrowed node at any level, as returned by [`PermissionTree::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeNode<'a> {
    Module(&'a ModuleNode),
    Sidebar(&'a SidebarNode),
    Entity(&'a EntityNode),
}

impl<'a> TreeNode<'a> {
    pub fn level(&self) -> NodeLevel {
        match self {
            TreeNode::Module(_) => NodeLevel::Module,
            TreeNode::Sidebar(_) => NodeLevel::Sidebar,
            TreeNode::Entity(_) => NodeLevel::Entity,
        }
    }

    pub fn key(&self) -> &'a str {
        match *self {
            TreeNode::Module(n) => &n.key,
            TreeNode::Sidebar(n) => &n.key,
            TreeNode::Entity(n) => &n.key,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            TreeNode::Module(n) => &n.name,
            TreeNode::Sidebar(n) => &n.name,
            TreeNode::Entity(n) => &n.name,
        }
    }

    /// Permissions held directly by this node; empty above the entity level.
    pub fn permissions(&self) -> &'a [AdaptedPermission] {
        match *self {
            TreeNode::Entity(n) => &n.permissions,
            _ => &[],
        }
    }
}

/// Nested grouping of adapted permissions. Built per request, never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionTree {
    pub(crate) modules: Vec<ModuleNode>,
}

impl PermissionTree {
    pub fn modules(&self) -> &[ModuleNode] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module(&self, key: &str) -> Option<&ModuleNode> {
        self.modules.iter().find(|m| m.key == key)
    }

    /// Every `[module, sidebar, entity]` path, in insertion order.
    pub fn list_paths(&self) -> Vec<[&str; 3]> {
        self.modules
            .iter()
            .flat_map(|m| {
                m.sidebars.iter().flat_map(move |s| {
                    s.entities
                        .iter()
                        .map(move |e| [m.key.as_str(), s.key.as_str(), e.key.as_str()])
                })
            })
            .collect()
    }

    /// Walks `path` one segment at a time. `None` as soon as a segment is
    /// missing, and for empty paths or paths deeper than the entity level.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<TreeNode<'_>> {
        let (first, rest) = path.split_first()?;
        let module = self.module(first.as_ref())?;
        let Some((second, rest)) = rest.split_first() else {
            return Some(TreeNode::Module(module));
        };
        let sidebar = module.sidebar(second.as_ref())?;
        let Some((third, rest)) = rest.split_first() else {
            return Some(TreeNode::Sidebar(sidebar));
        };
        let entity = sidebar.entity(third.as_ref())?;
        if rest.is_empty() {
            Some(TreeNode::Entity(entity))
        } else {
            None
        }
    }

    /// Permissions stored at `path`; empty unless the path names an entity node.
    pub fn permissions_at<S: AsRef<str>>(&self, path: &[S]) -> &[AdaptedPermission] {
        self.resolve(path)
            .map(|node| node.permissions())
            .unwrap_or(&[])
    }

    /// Total number of leaf permissions across all entity nodes.
    pub fn permission_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| &m.sidebars)
            .flat_map(|s| &s.entities)
            .map(|e| e.permissions.len())
            .sum()
    }
}

impl ModuleNode {
    pub fn sidebar(&self, key: &str) -> Option<&SidebarNode> {
        self.sidebars.iter().find(|s| s.key == key)
    }
}

impl SidebarNode {
    pub fn entity(&self, key: &str) -> Option<&EntityNode> {
        self.entities.iter().find(|e| e.key == key)
    }
}

/// Serializes a node list as a map keyed by each node's segment.
struct Keyed<'a, T>(&'a [T]);

trait HasKey {
    fn key(&self) -> &str;
}

impl HasKey for ModuleNode {
    fn key(&self) -> &str {
        &self.key
    }
}

impl HasKey for SidebarNode {
    fn key(&self) -> &str {
        &self.key
    }
}

impl HasKey for EntityNode {
    fn key(&self) -> &str {
        &self.key
    }
}

impl<T: HasKey + Serialize> Serialize for Keyed<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in self.0 {
            map.serialize_entry(node.key(), node)?;
        }
        map.end()
    }
}

impl Serialize for PermissionTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Keyed(&self.modules).serialize(serializer)
    }
}

impl Serialize for ModuleNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut node = serializer.serialize_struct("ModuleNode", 3)?;
        node.serialize_field("name", &self.name)?;
        node.serialize_field("level", &NodeLevel::Module)?;
        node.serialize_field("children", &Keyed(&self.sidebars))?;
        node.end()
    }
}

impl Serialize for SidebarNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut node = serializer.serialize_struct("SidebarNode", 3)?;
        node.serialize_field("name", &self.name)?;
        node.serialize_field("level", &NodeLevel::Sidebar)?;
        node.serialize_field("children", &Keyed(&self.entities))?;
        node.end()
    }
}

impl Serialize for EntityNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut node = serializer.serialize_struct("EntityNode", 3)?;
        node.serialize_field("name", &self.name)?;
        node.serialize_field("level", &NodeLevel::Entity)?;
        node.serialize_field("permissions", &self.permissions)?;
        node.end()
    }
}
