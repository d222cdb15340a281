use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Order;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartLine {
    pub dish_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Option<Vec<CartLine>>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub table_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlacedOrder {
    pub order_id: i32,
    pub total: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    /// `active` (default), `all`, or a concrete status such as `Paid`.
    pub status: Option<String>,
}
