use chrono::Local;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde_json::Value;

use crate::{
    dto::reviews::{ReviewList, SubmitReviewRequest},
    entity::reviews::{ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews},
    error::AppResult,
    middleware::auth::AdminSession,
    models::Review,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const DEFAULT_RATING: i32 = 5;

/// Store a customer review. The referenced order is not checked.
pub async fn submit_review(
    state: &AppState,
    payload: SubmitReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let review = ReviewActive {
        id: NotSet,
        order_id: Set(payload.order_id),
        rating: Set(normalize_rating(payload.rating.as_ref())),
        comment: Set(payload.comment.unwrap_or_default()),
        created_at: Set(Local::now().naive_local()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(review_id = review.id, order_id = ?review.order_id, rating = review.rating, "review submitted");

    Ok(ApiResponse::success(
        "Thanks for your review",
        review.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews(
    state: &AppState,
    _admin: &AdminSession,
) -> AppResult<ApiResponse<ReviewList>> {
    let items: Vec<Review> = Reviews::find()
        .order_by_desc(ReviewCol::CreatedAt)
        .order_by_desc(ReviewCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();

    let total = items.len();
    Ok(ApiResponse::list("Reviews", ReviewList { items }, total))
}

/// Accept integers 1-5 given as numbers or numeric strings; fall back to [`DEFAULT_RATING`].
pub fn normalize_rating(raw: Option<&Value>) -> i32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(rating @ 1..=5) => rating as i32,
        _ => DEFAULT_RATING,
    }
}
