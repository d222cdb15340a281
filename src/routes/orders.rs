use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};

use crate::{
    dto::orders::{PlaceOrderRequest, PlacedOrder},
    error::{AppError, AppResult},
    middleware::auth::TableSession,
    models::Order,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    params(
        ("x-table-session" = Option<String>, Header, description = "Token from /api/table-session")
    ),
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<PlacedOrder>),
        (status = 400, description = "Empty cart or invalid data"),
        (status = 500, description = "Order rolled back"),
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    table_session: Option<TableSession>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<PlacedOrder>>> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request("Invalid order data"))?;
    let resp = order_service::place_order(&state, payload, table_session).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}
