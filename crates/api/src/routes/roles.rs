//! Role management route handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    routing::{get, patch, put},
    Json, Router,
};
use domain::models::{
    AssignRolePermissionsRequest, CreateRoleRequest, Role, RoleFilter, RoleStatus,
    SetRoleStatusRequest, UpdateRoleRequest,
};
use serde::Deserialize;
use shared::pagination::PageRequest;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::response::{self, ApiResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
        .route("/:id/status", patch(set_role_status))
        .route("/:id/permissions", put(assign_permissions))
}

/// Query parameters for role listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListRolesQuery {
    pub name: Option<String>,
    pub status: Option<RoleStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/v1/roles
async fn list_roles(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<ListRolesQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Role>>, ApiError> {
    let Query(query) = query?;
    let pagination = state.config.pagination;
    let page = PageRequest::new(
        query.page,
        query.per_page,
        pagination.default_per_page,
        pagination.max_per_page,
    );
    let filter = RoleFilter {
        name: query.name.filter(|n| !n.trim().is_empty()),
        status: query.status,
    };

    let roles = state.roles.list_roles(&filter, page).await?;
    Ok(response::paginated("Roles retrieved", roles, uri.path()))
}

/// GET /api/v1/roles/:id
async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Role>, ApiError> {
    let role = state.roles.show_role(id).await?;
    Ok(response::ok("Role retrieved", role))
}

/// POST /api/v1/roles
async fn create_role(
    State(state): State<AppState>,
    payload: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> Result<ApiResponse<Role>, ApiError> {
    let Json(request) = payload?;
    let role = state.roles.create_role(request).await?;
    Ok(response::created("Role created", role))
}

/// PUT /api/v1/roles/:id
async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> Result<ApiResponse<Role>, ApiError> {
    let Json(request) = payload?;
    let role = state.roles.update_role(id, request).await?;
    Ok(response::ok("Role updated", role))
}

/// PATCH /api/v1/roles/:id/status
async fn set_role_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SetRoleStatusRequest>, JsonRejection>,
) -> Result<ApiResponse<Role>, ApiError> {
    let Json(request) = payload?;
    let role = state.roles.set_role_status(id, request.status).await?;
    Ok(response::ok("Role status updated", role))
}

/// PUT /api/v1/roles/:id/permissions
async fn assign_permissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AssignRolePermissionsRequest>, JsonRejection>,
) -> Result<ApiResponse<Role>, ApiError> {
    let Json(request) = payload?;
    let role = state
        .roles
        .assign_permissions_to_role(id, &request.permissions)
        .await?;
    Ok(response::ok("Role permissions updated", role))
}

/// DELETE /api/v1/roles/:id
async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    state.roles.delete_role(id).await?;
    Ok(response::ok("Role deleted", ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_roles_query_parses_status() {
        let query = parse_query("name=adm&status=inactive&page=2").unwrap();
        assert_eq!(query.name.as_deref(), Some("adm"));
        assert_eq!(query.status, Some(RoleStatus::Inactive));
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, None);
    }

    #[test]
    fn test_list_roles_query_rejects_unknown_status() {
        assert!(parse_query("status=archived").is_err());
    }

    fn parse_query(raw: &str) -> Result<ListRolesQuery, QueryRejection> {
        let uri: axum::http::Uri = format!("/roles?{raw}").parse().unwrap();
        Query::try_from_uri(&uri).map(|Query(q)| q)
    }
}
