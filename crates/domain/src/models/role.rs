//! Role domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role availability. Inactive roles keep their links but grant nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    #[default]
    Active,
    Inactive,
}

impl RoleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleStatus::Active => "active",
            RoleStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for RoleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(RoleStatus::Active),
            "inactive" => Ok(RoleStatus::Inactive),
            _ => Err(format!("Unknown role status: {}", s)),
        }
    }
}

impl std::fmt::Display for RoleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: RoleStatus,
    /// Stored (three-segment) permission names, sorted
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: RoleStatus,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Partial role update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub status: Option<RoleStatus>,
    pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetRoleStatusRequest {
    pub status: RoleStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRolePermissionsRequest {
    pub permissions: Vec<String>,
}

/// Filters for role listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleFilter {
    /// Case-insensitive substring match on the role name
    pub name: Option<String>,
    pub status: Option<RoleStatus>,
}

impl RoleFilter {
    pub fn matches(&self, role: &Role) -> bool {
        let name_ok = self.name.as_deref().map_or(true, |needle| {
            role.name.to_lowercase().contains(&needle.to_lowercase())
        });
        let status_ok = self.status.map_or(true, |status| role.status == status);
        name_ok && status_ok
    }
}

/// Request to replace a user's roles and direct permissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignUserAccessRequest {
    #[serde(default)]
    pub roles: Vec<Uuid>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Short role reference embedded in [`UserAccess`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: Uuid,
    pub name: String,
    pub status: RoleStatus,
}

impl From<&Role> for RoleSummary {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            status: role.status,
        }
    }
}

/// A user's authorization profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccess {
    pub user_id: Uuid,
    pub roles: Vec<RoleSummary>,
    /// Permissions granted to the user directly
    pub permissions: Vec<String>,
    /// Direct permissions plus those of every active role, sorted and unique
    pub effective_permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_status_from_str() {
        assert_eq!("active".parse::<RoleStatus>().unwrap(), RoleStatus::Active);
        assert_eq!("INACTIVE".parse::<RoleStatus>().unwrap(), RoleStatus::Inactive);
        assert!("archived".parse::<RoleStatus>().is_err());
    }

    #[test]
    fn test_role_status_serde() {
        assert_eq!(serde_json::to_string(&RoleStatus::Inactive).unwrap(), "\"inactive\"");
        let status: RoleStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, RoleStatus::Active);
    }

    #[test]
    fn test_create_role_request_defaults() {
        let request: CreateRoleRequest = serde_json::from_str(r#"{"name":"Soporte"}"#).unwrap();
        assert_eq!(request.status, RoleStatus::Active);
        assert!(request.permissions.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_role_request_blank_name() {
        let request = CreateRoleRequest {
            name: "   ".to_string(),
            description: None,
            status: RoleStatus::Active,
            permissions: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_role_request_validates_present_fields_only() {
        assert!(UpdateRoleRequest::default().validate().is_ok());
        let request = UpdateRoleRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_role_filter() {
        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name: "Administrador".to_string(),
            description: None,
            status: RoleStatus::Inactive,
            permissions: vec![],
            created_at: now,
            updated_at: now,
        };

        assert!(RoleFilter::default().matches(&role));
        assert!(RoleFilter {
            name: Some("admin".into()),
            status: None
        }
        .matches(&role));
        assert!(!RoleFilter {
            name: None,
            status: Some(RoleStatus::Active)
        }
        .matches(&role));
    }
}
