//! Domain services for the marketplace admin backend.
//!
//! The permission adapter and tree builder are pure; the role and resource
//! services orchestrate the storage traits in [`crate::store`].

pub mod commerce_review;
pub mod permission_adapter;
pub mod permission_tree;
pub mod resource_service;
pub mod role_service;

pub use permission_adapter::{
    capitalize, split_permission_name, DisplayKind, PermissionAdapter, PermissionTables,
};
pub use permission_tree::PermissionTreeBuilder;
pub use resource_service::ResourceService;
pub use role_service::RoleService;
