//! Uniform JSON envelope for successful responses.
//!
//! ```json
//! { "status": "success", "message": "...", "data": ..., "meta": ..., "links": ... }
//! ```
//! `meta` and `links` are present on paginated listings only.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use shared::pagination::{Page, PageLinks, PageMeta};

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
}

pub type ApiResponse<T> = (StatusCode, Json<Envelope<T>>);

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> ApiResponse<T> {
    with_status(StatusCode::OK, message, data)
}

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> ApiResponse<T> {
    with_status(StatusCode::CREATED, message, data)
}

fn with_status<T: Serialize>(status: StatusCode, message: impl Into<String>, data: T) -> ApiResponse<T> {
    (
        status,
        Json(Envelope {
            status: "success",
            message: message.into(),
            data,
            meta: None,
            links: None,
        }),
    )
}

/// A page of results with its metadata and navigation links built from `path`.
pub fn paginated<T: Serialize>(message: impl Into<String>, page: Page<T>, path: &str) -> ApiResponse<Vec<T>> {
    let links = PageLinks::build(path, &page.meta);
    (
        StatusCode::OK,
        Json(Envelope {
            status: "success",
            message: message.into(),
            data: page.items,
            meta: Some(page.meta),
            links: Some(links),
        }),
    )
}
