//! Integration tests for role management and user access endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    create_test_app, create_test_role, create_test_user, delete_request, get_request,
    json_request, send,
};
use serde_json::json;
use uuid::Uuid;

// =============================================================================
// Roles
// =============================================================================

#[tokio::test]
async fn test_create_and_get_role() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/roles",
            json!({
                "name": "  Support agent ",
                "description": "Handles tickets",
                "permissions": ["app.support.create", "admin.users.view", "app.support.create"]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Role created");
    let role = &body["data"];
    assert_eq!(role["name"], "Support agent");
    assert_eq!(role["status"], "active");
    assert_eq!(
        role["permissions"],
        json!(["admin.users.view", "app.support.create"])
    );

    let id = role["id"].as_str().unwrap();
    let (status, body) = send(&app, get_request(&format!("/api/v1/roles/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Handles tickets");
}

#[tokio::test]
async fn test_create_role_duplicate_name_is_case_insensitive() {
    let app = create_test_app();
    create_test_role(&app, "Auditor", &[]).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/v1/roles", json!({ "name": "AUDITOR" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("AUDITOR"));
}

#[tokio::test]
async fn test_create_role_with_unknown_permission_creates_nothing() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/roles",
            json!({ "name": "Ghost", "permissions": ["admin.roles.view", "admin.ghosts.view"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("admin.ghosts.view"));

    let (_, body) = send(&app, get_request("/api/v1/roles?name=ghost")).await;
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_create_role_rejects_blank_name() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request("POST", "/api/v1/roles", json!({ "name": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "name");
}

#[tokio::test]
async fn test_get_missing_role() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        get_request(&format!("/api/v1/roles/{}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_list_roles_filters_and_paginates() {
    let app = create_test_app();
    for name in ["Admin", "Administrador regional", "Editor", "Viewer"] {
        create_test_role(&app, name, &[]).await;
    }

    let (status, body) = send(&app, get_request("/api/v1/roles?per_page=3&page=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 4);
    assert_eq!(body["meta"]["last_page"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Viewer");
    assert_eq!(body["links"]["prev"], "/api/v1/roles?page=1&per_page=3");
    assert!(body["links"]["next"].is_null());

    let (_, body) = send(&app, get_request("/api/v1/roles?name=ADMIN")).await;
    assert_eq!(body["meta"]["total"], 2);

    let (status, _) = send(&app, get_request("/api/v1/roles?status=archived")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_role() {
    let app = create_test_app();
    let id = create_test_role(&app, "Editor", &["admin.roles.view"]).await;
    create_test_role(&app, "Reviewer", &[]).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/roles/{id}"),
            json!({ "name": "Senior editor", "permissions": ["admin.roles.edit"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Senior editor");
    assert_eq!(body["data"]["permissions"], json!(["admin.roles.edit"]));

    // Keeping its own name is not a duplicate
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/roles/{id}"),
            json!({ "name": "senior EDITOR" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/roles/{id}"),
            json!({ "name": "Reviewer" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_set_status_and_assign_permissions() {
    let app = create_test_app();
    let id = create_test_role(&app, "Operator", &[]).await;

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/v1/roles/{id}/status"),
            json!({ "status": "inactive" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "inactive");

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/roles/{id}/permissions"),
            json!({ "permissions": ["admin.dashboard.view", "admin.commerces.review"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["permissions"],
        json!(["admin.commerces.review", "admin.dashboard.view"])
    );

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/roles/{id}/permissions"),
            json!({ "permissions": ["admin.dashboard"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_role() {
    let app = create_test_app();
    let id = create_test_role(&app, "Temporary", &["admin.roles.view"]).await;

    let (status, _) = send(&app, delete_request(&format!("/api/v1/roles/{id}"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get_request(&format!("/api/v1/roles/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete_request(&format!("/api/v1/roles/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_role_in_use_conflicts() {
    let app = create_test_app();
    let role_id = create_test_role(&app, "Assigned", &[]).await;
    let user_id = create_test_user(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/users/{user_id}/access"),
            json!({ "roles": [role_id] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, delete_request(&format!("/api/v1/roles/{role_id}"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, get_request(&format!("/api/v1/roles/{role_id}"))).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// User access
// =============================================================================

#[tokio::test]
async fn test_user_access_combines_roles_and_direct_permissions() {
    let app = create_test_app();
    let role_id =
        create_test_role(&app, "Catalog", &["admin.countries.view", "admin.cities.view"]).await;
    let user_id = create_test_user(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/users/{user_id}/access"),
            json!({
                "roles": [role_id, role_id],
                "permissions": ["admin.dashboard.view", "admin.cities.view"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = &body["data"];
    assert_eq!(access["roles"].as_array().unwrap().len(), 1);
    assert_eq!(
        access["permissions"],
        json!(["admin.cities.view", "admin.dashboard.view"])
    );
    assert_eq!(
        access["effective_permissions"],
        json!(["admin.cities.view", "admin.countries.view", "admin.dashboard.view"])
    );

    let (status, body) = send(
        &app,
        get_request(&format!("/api/v1/users/{user_id}/permission-tree")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let parametrization = &body["data"]["admin"]["children"]["parametrization"];
    assert_eq!(parametrization["name"], "Parametrización");
    assert!(parametrization["children"]["countries"].is_object());
    assert!(body["data"]["provider"].is_null());
}

#[tokio::test]
async fn test_inactive_role_grants_nothing() {
    let app = create_test_app();
    let role_id = create_test_role(&app, "Seasonal", &["provider.campaigns.view"]).await;
    let user_id = create_test_user(&app).await;

    send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/users/{user_id}/access"),
            json!({ "roles": [role_id] }),
        ),
    )
    .await;
    send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/v1/roles/{role_id}/status"),
            json!({ "status": "inactive" }),
        ),
    )
    .await;

    let (status, body) = send(&app, get_request(&format!("/api/v1/users/{user_id}/access"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["roles"][0]["status"], "inactive");
    assert_eq!(body["data"]["effective_permissions"], json!([]));
}

#[tokio::test]
async fn test_user_access_unknown_user_or_role() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        get_request(&format!("/api/v1/users/{}/access", Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let user_id = create_test_user(&app).await;
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/users/{user_id}/access"),
            json!({ "roles": [Uuid::new_v4()] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().starts_with("Role not found"));

    let (_, body) = send(&app, get_request(&format!("/api/v1/users/{user_id}/access"))).await;
    assert_eq!(body["data"]["roles"], json!([]));
}
