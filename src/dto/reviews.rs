use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::Review;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    /// Integer 1-5, as a number or numeric string; anything else counts as 5.
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub order_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ReviewList {
    #[schema(value_type = Vec<Review>)]
    pub items: Vec<Review>,
}
