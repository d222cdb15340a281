use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, rejection::JsonRejection},
    routing::{get, post, put},
};

use crate::{
    dto::{
        admin::{
            CategoryList, CreateCategoryRequest, CreateTableRequest, DashboardStats, DishForm,
            DishList, RevenueTrend, TableList, UpdateCategoryRequest, UpdateTableRequest,
            UploadedFile,
        },
        auth::{LoginRequest, LoginResponse},
        orders::{OrderList, OrderListQuery, UpdateOrderStatusRequest},
        reviews::ReviewList,
    },
    error::{AppError, AppResult},
    middleware::auth::AdminSession,
    models::{Category, DiningTable, Dish, Order},
    response::ApiResponse,
    services::{admin_service, auth_service, catalog_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/stats", get(stats))
        .route("/revenue-trend", get(revenue_trend))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/dishes", get(list_dishes).post(create_dish))
        .route("/dishes/{id}", put(update_dish).delete(delete_dish))
        .route("/tables", get(list_tables).post(create_table))
        .route("/tables/{id}", put(update_table).delete(delete_table))
        .route("/reviews", get(list_reviews))
}

/// Collect the admin dish form. Unknown fields are ignored.
async fn read_dish_form(mut multipart: Multipart) -> AppResult<DishForm> {
    let mut form = DishForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Invalid multipart request: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(format!("Multipart error: {e}")))?
                .to_vec();
            form.image = Some(UploadedFile { filename, bytes });
            continue;
        }

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "price" => &mut form.price,
            "category_id" => &mut form.category_id,
            "description" => &mut form.description,
            "is_available" => &mut form.is_available,
            _ => continue,
        };
        let text = field
            .text()
            .await
            .map_err(|e| AppError::bad_request(format!("Multipart error: {e}")))?;
        *slot = Some(text);
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin session token", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Wrong password"),
    ),
    tag = "Admin"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request("Invalid login data"))?;
    let resp = auth_service::admin_login(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Today's revenue and order counts", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn stats(
    State(state): State<AppState>,
    admin: AdminSession,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = admin_service::dashboard_stats(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/revenue-trend",
    responses(
        (status = 200, description = "Paid revenue for the last 7 days", body = ApiResponse<RevenueTrend>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn revenue_trend(
    State(state): State<AppState>,
    admin: AdminSession,
) -> AppResult<Json<ApiResponse<RevenueTrend>>> {
    let resp = admin_service::revenue_trend(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("status" = Option<String>, Query, description = "active (default), all, or an order status")
    ),
    responses(
        (status = 200, description = "Orders with items, newest first", body = ApiResponse<OrderList>),
        (status = 400, description = "Unknown filter"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    admin: AdminSession,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_orders(&state, &admin, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<Order>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::get_order(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request("Invalid status data"))?;
    let resp = admin_service::update_order_status(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "Categories in display order", body = ApiResponse<CategoryList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    admin: AdminSession,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Missing name"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    admin: AdminSession,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request("Invalid category data"))?;
    let resp = catalog_service::create_category(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request("Invalid category data"))?;
    let resp = catalog_service::update_category(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted, its dishes detached"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_category(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dishes",
    responses(
        (status = 200, description = "All dishes", body = ApiResponse<DishList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_dishes(
    State(state): State<AppState>,
    admin: AdminSession,
) -> AppResult<Json<ApiResponse<DishList>>> {
    let resp = catalog_service::list_dishes(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/dishes",
    request_body(content = DishForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Dish created", body = ApiResponse<Dish>),
        (status = 400, description = "Invalid form"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_dish(
    State(state): State<AppState>,
    admin: AdminSession,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Dish>>> {
    let form = read_dish_form(multipart).await?;
    let resp = catalog_service::create_dish(&state, &admin, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/dishes/{id}",
    params(
        ("id" = i32, Path, description = "Dish ID")
    ),
    request_body(content = DishForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Dish updated", body = ApiResponse<Dish>),
        (status = 400, description = "Invalid form"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_dish(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Dish>>> {
    let form = read_dish_form(multipart).await?;
    let resp = catalog_service::update_dish(&state, &admin, id, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/dishes/{id}",
    params(
        ("id" = i32, Path, description = "Dish ID")
    ),
    responses(
        (status = 200, description = "Dish and its image deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_dish(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_dish(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/tables",
    responses(
        (status = 200, description = "All tables", body = ApiResponse<TableList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_tables(
    State(state): State<AppState>,
    admin: AdminSession,
) -> AppResult<Json<ApiResponse<TableList>>> {
    let resp = catalog_service::list_tables(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/tables",
    request_body = CreateTableRequest,
    responses(
        (status = 200, description = "Table created", body = ApiResponse<DiningTable>),
        (status = 400, description = "Missing name"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_table(
    State(state): State<AppState>,
    admin: AdminSession,
    payload: Result<Json<CreateTableRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request("Invalid table data"))?;
    let resp = catalog_service::create_table(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/tables/{id}",
    params(
        ("id" = i32, Path, description = "Table ID")
    ),
    request_body = UpdateTableRequest,
    responses(
        (status = 200, description = "Table updated", body = ApiResponse<DiningTable>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_table(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateTableRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request("Invalid table data"))?;
    let resp = catalog_service::update_table(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/tables/{id}",
    params(
        ("id" = i32, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "Table deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_table(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_table(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    responses(
        (status = 200, description = "Reviews, newest first", body = ApiResponse<ReviewList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    admin: AdminSession,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews(&state, &admin).await?;
    Ok(Json(resp))
}
