//! Generic CRUD routes for paginated resources.
//!
//! One router per [`Resource`] type, mounted by `app::create_app`:
//!
//! - `GET /` list (query: `page`, `per_page`, `with_inactive`, filter fields)
//! - `POST /` create
//! - `GET /:id`, `PUT /:id`, `DELETE /:id`

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, Query, State},
    routing::get,
    Json, Router,
};
use domain::models::{Record, Resource};
use domain::services::ResourceService;
use domain::DomainError;
use shared::pagination::PageRequest;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::error::ApiError;
use crate::response::{self, ApiResponse};

/// State for the routes of one resource type.
pub struct ResourceState<R: Resource> {
    pub service: ResourceService<R>,
    pub pagination: PaginationConfig,
}

impl<R: Resource> ResourceState<R> {
    pub fn new(service: ResourceService<R>, pagination: PaginationConfig) -> Self {
        Self {
            service,
            pagination,
        }
    }
}

impl<R: Resource> Clone for ResourceState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            pagination: self.pagination,
        }
    }
}

/// CRUD routes still expecting their state, for callers that add routes.
pub fn routes<R: Resource>() -> Router<ResourceState<R>> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/:id", get(show::<R>).put(update::<R>).delete(destroy::<R>))
}

pub fn router<R: Resource, S>(state: ResourceState<R>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes::<R>().with_state(state)
}

fn parse_param<T: FromStr>(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ApiError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid value for {}: {}", key, value))),
    }
}

/// GET /
async fn list<R: Resource>(
    State(state): State<ResourceState<R>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<Vec<Record<R>>>, ApiError> {
    let page = PageRequest::new(
        parse_param(&params, "page")?,
        parse_param(&params, "per_page")?,
        state.pagination.default_per_page,
        state.pagination.max_per_page,
    );
    let with_inactive = parse_param::<bool>(&params, "with_inactive")?.unwrap_or(false);

    let result = state.service.list(&params, page, with_inactive).await?;
    Ok(response::paginated(
        format!("{} records retrieved", R::KIND),
        result,
        uri.path(),
    ))
}

/// POST /
async fn create<R: Resource>(
    State(state): State<ResourceState<R>>,
    payload: Result<Json<R::Create>, JsonRejection>,
) -> Result<ApiResponse<Record<R>>, ApiError> {
    let Json(input) = payload?;
    let record = state.service.create(input).await?;
    Ok(response::created(format!("{} created", R::KIND), record))
}

/// GET /:id
async fn show<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Record<R>>, ApiError> {
    let record = state.service.show(id).await?;
    Ok(response::ok(format!("{} retrieved", R::KIND), record))
}

/// PUT /:id
async fn update<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<R::Update>, JsonRejection>,
) -> Result<ApiResponse<Record<R>>, ApiError> {
    let Json(patch) = payload?;
    let record = state.service.update(id, patch).await?;
    Ok(response::ok(format!("{} updated", R::KIND), record))
}

/// DELETE /:id
async fn destroy<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    if !state.service.delete(id).await? {
        return Err(DomainError::not_found(R::KIND, id).into());
    }
    Ok(response::ok(format!("{} deleted", R::KIND), ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_param() {
        let p = params(&[("page", "3"), ("with_inactive", "true"), ("per_page", " ")]);

        assert_eq!(parse_param::<u32>(&p, "page").unwrap(), Some(3));
        assert_eq!(parse_param::<bool>(&p, "with_inactive").unwrap(), Some(true));
        assert_eq!(parse_param::<u32>(&p, "per_page").unwrap(), None);
        assert_eq!(parse_param::<u32>(&p, "missing").unwrap(), None);
    }

    #[test]
    fn test_parse_param_rejects_garbage() {
        let p = params(&[("page", "two")]);
        let err = parse_param::<u32>(&p, "page").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("page")));
    }
}
