use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use crate::{
    dto::reviews::SubmitReviewRequest,
    error::{AppError, AppResult},
    models::Review,
    response::ApiResponse,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_review))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = SubmitReviewRequest,
    responses(
        (status = 200, description = "Review stored", body = ApiResponse<Review>),
        (status = 400, description = "Body is not JSON"),
    ),
    tag = "Reviews"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    payload: Result<Json<SubmitReviewRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request("Invalid review data"))?;
    let resp = review_service::submit_review(&state, payload).await?;
    Ok(Json(resp))
}
