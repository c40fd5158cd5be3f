//! Permission catalog route handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use domain::models::{
    AdaptedPermission, CreatePermissionRequest, PermissionTree, RawPermission,
    ReversePermissionsRequest, ReversePermissionsResponse,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::response::{self, ApiResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_permissions).post(create_permission))
        .route("/adapted", get(adapted_permissions))
        .route("/tree", get(permission_tree))
        .route("/reverse", post(reverse_permissions))
}

/// GET /api/v1/permissions
async fn list_permissions(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<RawPermission>>, ApiError> {
    let permissions = state.roles.list_permissions().await?;
    Ok(response::ok("Permissions retrieved", permissions))
}

/// POST /api/v1/permissions
async fn create_permission(
    State(state): State<AppState>,
    payload: Result<Json<CreatePermissionRequest>, JsonRejection>,
) -> Result<ApiResponse<RawPermission>, ApiError> {
    let Json(request) = payload?;
    let permission = state.roles.create_permission(request).await?;
    Ok(response::created("Permission created", permission))
}

/// GET /api/v1/permissions/adapted
async fn adapted_permissions(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<AdaptedPermission>>, ApiError> {
    let permissions = state.roles.adapted_permissions().await?;
    Ok(response::ok("Permissions retrieved", permissions))
}

/// GET /api/v1/permissions/tree
async fn permission_tree(
    State(state): State<AppState>,
) -> Result<ApiResponse<PermissionTree>, ApiError> {
    let tree = state.roles.permission_tree().await?;
    Ok(response::ok("Permission tree retrieved", tree))
}

/// POST /api/v1/permissions/reverse
///
/// Converts the four-segment names the UI works with back to stored names.
async fn reverse_permissions(
    State(state): State<AppState>,
    payload: Result<Json<ReversePermissionsRequest>, JsonRejection>,
) -> Result<ApiResponse<ReversePermissionsResponse>, ApiError> {
    let Json(request) = payload?;
    let names = state.roles.reverse_adapt(&request.names)?;
    Ok(response::ok(
        "Permissions converted",
        ReversePermissionsResponse { names },
    ))
}
