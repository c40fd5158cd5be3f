//! Commerce routes: generic CRUD plus the provider review workflow.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::post,
    Json, Router,
};
use domain::models::{Commerce, Record, ReviewCommerceRequest};
use uuid::Uuid;

use crate::error::ApiError;
use crate::response::{self, ApiResponse};
use crate::routes::resources::{self, ResourceState};

pub fn router<S>(state: ResourceState<Commerce>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    resources::routes::<Commerce>()
        .route("/:id/review", post(review))
        .route("/:id/resubmit", post(resubmit))
        .with_state(state)
}

/// POST /commerces/:id/review
async fn review(
    State(state): State<ResourceState<Commerce>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ReviewCommerceRequest>, JsonRejection>,
) -> Result<ApiResponse<Record<Commerce>>, ApiError> {
    let Json(request) = payload?;
    let record = state.service.review_commerce(id, request).await?;
    Ok(response::ok("Commerce reviewed", record))
}

/// POST /commerces/:id/resubmit
async fn resubmit(
    State(state): State<ResourceState<Commerce>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Record<Commerce>>, ApiError> {
    let record = state.service.resubmit_commerce(id).await?;
    Ok(response::ok("Commerce resubmitted for review", record))
}
