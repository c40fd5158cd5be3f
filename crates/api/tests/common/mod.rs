//! Common test utilities for integration tests.
//!
//! Every test builds its own router over a freshly seeded in-process store,
//! so tests neither share state nor need a database.

// Helpers are shared by several test binaries; not all of them use every one.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use marketplace_admin_api::{
    app::{create_app, Services},
    config::Config,
};
use persistence::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("Failed to build test config")
}

/// Router over the seeded permission catalog.
pub fn create_test_app() -> Router {
    create_test_app_with(test_config(), MemoryStore::seeded())
}

pub fn create_test_app_with(config: Config, store: MemoryStore) -> Router {
    create_app(config, Services::memory(store))
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn parse_response_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// Sends `request` and returns the status with the decoded JSON body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, parse_response_body(response).await)
}

/// Creates an admin-segment user and returns its id.
pub async fn create_test_user(app: &Router) -> Uuid {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let email: String = SafeEmail().fake();

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/users",
            json!({
                "first_name": first_name,
                "last_name": last_name,
                "email": email,
                "segment": "admin"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "user creation failed: {body}");
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}

/// Creates a role with the given stored permission names and returns its id.
pub async fn create_test_role(app: &Router, name: &str, permissions: &[&str]) -> Uuid {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/roles",
            json!({ "name": name, "permissions": permissions }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "role creation failed: {body}");
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}
