//! Integration tests for the permission catalog endpoints.

mod common;

use axum::http::StatusCode;
use common::{create_test_app, get_request, json_request, send};
use serde_json::{json, Value};

fn names(data: &Value) -> Vec<&str> {
    data.as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_list_permissions_returns_seeded_catalog() {
    let app = create_test_app();

    let (status, body) = send(&app, get_request("/api/v1/permissions")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let names = names(&body["data"]);
    assert_eq!(names.len(), 24);
    assert!(names.contains(&"admin.roles.view"));
    assert!(names.contains(&"app.support.create"));
}

#[tokio::test]
async fn test_adapted_permissions_insert_sidebar_group() {
    let app = create_test_app();

    let (status, body) = send(&app, get_request("/api/v1/permissions/adapted")).await;

    assert_eq!(status, StatusCode::OK);
    let names = names(&body["data"]);
    assert!(names.contains(&"admin.profiles.roles.view"));
    assert!(names.contains(&"admin.parametrization.countries.edit"));
    assert!(names.contains(&"provider.marketing.campaigns.create"));
    // Unmapped entities are their own sidebar group
    assert!(names.contains(&"admin.commerces.commerces.review"));

    let roles_view = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "admin.profiles.roles.view")
        .unwrap();
    assert_eq!(roles_view["module"], "admin");
    assert_eq!(roles_view["sidebar"], "profiles");
    assert_eq!(roles_view["entity"], "roles");
    assert_eq!(roles_view["action"], "view");
}

#[tokio::test]
async fn test_permission_tree_shape() {
    let app = create_test_app();

    let (status, body) = send(&app, get_request("/api/v1/permissions/tree")).await;

    assert_eq!(status, StatusCode::OK);
    let tree = &body["data"];
    assert_eq!(tree["admin"]["name"], "Administrador");
    assert_eq!(tree["admin"]["level"], "module");
    assert_eq!(tree["provider"]["name"], "Proveedor");
    assert_eq!(tree["app"]["name"], "Aplicación");

    let profiles = &tree["admin"]["children"]["profiles"];
    assert_eq!(profiles["name"], "Perfiles");
    assert_eq!(profiles["level"], "sidebar");

    let roles = &profiles["children"]["roles"];
    assert_eq!(roles["level"], "entity");
    assert_eq!(roles["permissions"].as_array().unwrap().len(), 4);

    // Unmapped sidebar keys fall back to capitalization
    assert_eq!(tree["admin"]["children"]["commerces"]["name"], "Commerces");
}

#[tokio::test]
async fn test_create_permission() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/permissions",
            json!({ "name": "admin.reports.view", "description": "View reports" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "admin.reports.view");

    let (_, body) = send(&app, get_request("/api/v1/permissions/tree")).await;
    assert_eq!(
        body["data"]["admin"]["children"]["reports"]["children"]["reports"]["permissions"][0]
            ["name"],
        "admin.reports.reports.view"
    );
}

#[tokio::test]
async fn test_create_duplicate_permission_conflicts() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/permissions",
            json!({ "name": "admin.roles.view" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_create_malformed_permission_rejected() {
    let app = create_test_app();

    for name in ["admin.reports", "admin.reports.view.extra", "Admin.Reports.View"] {
        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/permissions", json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{name}: {body}");
    }

    let (_, body) = send(&app, get_request("/api/v1/permissions")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn test_reverse_permissions() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/permissions/reverse",
            json!({ "names": ["admin.profiles.roles.view", "provider.marketing.campaigns.create"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["names"],
        json!(["admin.roles.view", "provider.campaigns.create"])
    );
}

#[tokio::test]
async fn test_reverse_rejects_three_segment_names() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/permissions/reverse",
            json!({ "names": ["admin.roles.view"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("admin.roles.view"));
}

#[tokio::test]
async fn test_unparseable_body_is_bad_request() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        json_request("POST", "/api/v1/permissions", json!({ "description": "no name" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}
