use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::{
        auth::{TableSessionQuery, TableSessionResponse},
        menu::Menu,
    },
    error::AppResult,
    response::ApiResponse,
    services::{auth_service, menu_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/table-session", get(open_table_session))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    responses(
        (status = 200, description = "Categories in display order with their available dishes", body = ApiResponse<Menu>)
    ),
    tag = "Menu"
)]
pub async fn get_menu(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::menu(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/table-session",
    params(
        ("table" = i32, Query, description = "Table ID from the QR code")
    ),
    responses(
        (status = 200, description = "Signed table session", body = ApiResponse<TableSessionResponse>),
        (status = 404, description = "Unknown table"),
    ),
    tag = "Menu"
)]
pub async fn open_table_session(
    State(state): State<AppState>,
    Query(query): Query<TableSessionQuery>,
) -> AppResult<Json<ApiResponse<TableSessionResponse>>> {
    let resp = auth_service::open_table_session(&state, query).await?;
    Ok(Json(resp))
}
