//! User role and permission assignment handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use domain::models::{AssignUserAccessRequest, PermissionTree, UserAccess};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::response::{self, ApiResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/access", get(get_access).put(assign_access))
        .route("/:id/permission-tree", get(permission_tree))
}

/// GET /api/v1/users/:id/access
async fn get_access(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<UserAccess>, ApiError> {
    let access = state.roles.user_access(user_id).await?;
    Ok(response::ok("User access retrieved", access))
}

/// PUT /api/v1/users/:id/access
///
/// Replaces both the role set and the direct permission set.
async fn assign_access(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<AssignUserAccessRequest>, JsonRejection>,
) -> Result<ApiResponse<UserAccess>, ApiError> {
    let Json(request) = payload?;
    let access = state
        .roles
        .assign_roles_and_permissions_to_user(user_id, request)
        .await?;
    Ok(response::ok("User access updated", access))
}

/// GET /api/v1/users/:id/permission-tree
async fn permission_tree(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<PermissionTree>, ApiError> {
    let tree = state.roles.user_permission_tree(user_id).await?;
    Ok(response::ok("User permission tree retrieved", tree))
}
