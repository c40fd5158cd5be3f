//! Permission domain models.
//!
//! Permissions are stored with three-segment names (`module.entity.action`).
//! The admin UI works with a four-segment form that inserts a sidebar group
//! after the module (`module.sidebar.entity.action`); see
//! [`crate::services::permission_adapter`].

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A permission as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPermission {
    /// Unique `module.entity.action` identifier (e.g. "admin.roles.view")
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl RawPermission {
    pub fn new(name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_string),
        }
    }
}

/// A permission rewritten for UI consumption. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptedPermission {
    /// Four-segment name, `module.sidebar.entity.action`
    pub name: String,
    pub module: String,
    pub sidebar: String,
    pub entity: String,
    pub action: String,
    pub description: Option<String>,
}

/// Request to register a permission in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePermissionRequest {
    #[validate(custom(function = "shared::validation::validate_permission_name"))]
    pub name: String,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
}

/// Four-segment names submitted back by the UI on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReversePermissionsRequest {
    pub names: Vec<String>,
}

/// Three-segment names produced from a [`ReversePermissionsRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReversePermissionsResponse {
    pub names: Vec<String>,
}
