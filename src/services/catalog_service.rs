use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::admin::{
        CategoryList, CreateCategoryRequest, CreateTableRequest, DishForm, DishList, TableList,
        UpdateCategoryRequest, UpdateTableRequest,
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        dining_tables::{ActiveModel as TableActive, Column as TableCol, Entity as DiningTables},
        dishes::{ActiveModel as DishActive, Column as DishCol, Entity as Dishes},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminSession,
    models::{Category, DiningTable, Dish},
    response::{ApiResponse, Meta},
    state::AppState,
    upload::{process_upload_image, remove_upload},
};

// ─── categories ───

pub async fn list_categories(
    state: &AppState,
    _admin: &AdminSession,
) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(CategoryCol::SortOrder)
        .order_by_asc(CategoryCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    let total = items.len();
    Ok(ApiResponse::list("Categories", CategoryList { items }, total))
}

pub async fn create_category(
    state: &AppState,
    _admin: &AdminSession,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let name = required_text(Some(payload.name), "name")?;
    let category = CategoryActive {
        id: NotSet,
        name: Set(name),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(category_id = category.id, "category created");
    Ok(ApiResponse::success(
        "Category created",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    _admin: &AdminSession,
    id: i32,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoryActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(required_text(Some(name), "name")?);
    }
    if let Some(sort_order) = payload.sort_order {
        active.sort_order = Set(sort_order);
    }
    let category = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Category updated",
        category.into(),
        Some(Meta::empty()),
    ))
}

/// Remove a category. Its dishes stay, uncategorised.
pub async fn delete_category(
    state: &AppState,
    _admin: &AdminSession,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    Categories::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let detached = Dishes::update_many()
        .col_expr(DishCol::CategoryId, Expr::value(Option::<i32>::None))
        .filter(DishCol::CategoryId.eq(id))
        .exec(&txn)
        .await?;
    Categories::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        category_id = id,
        detached = detached.rows_affected,
        "category deleted"
    );
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// ─── dishes ───

pub async fn list_dishes(
    state: &AppState,
    _admin: &AdminSession,
) -> AppResult<ApiResponse<DishList>> {
    let items: Vec<Dish> = Dishes::find()
        .order_by_asc(DishCol::CategoryId)
        .order_by_asc(DishCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Dish::from)
        .collect();
    let total = items.len();
    Ok(ApiResponse::list("Dishes", DishList { items }, total))
}

pub async fn create_dish(
    state: &AppState,
    _admin: &AdminSession,
    form: DishForm,
) -> AppResult<ApiResponse<Dish>> {
    let name = required_text(form.name, "name")?;
    let price = parse_price(form.price.as_deref().unwrap_or_default())?;
    let category_id = parse_category_ref(form.category_id.as_deref())?;
    if let Some(category_id) = category_id {
        ensure_category(&state.orm, category_id).await?;
    }

    let image_path = match &form.image {
        Some(file) => process_upload_image(file, &state.config.upload_dir)
            .await?
            .unwrap_or_default(),
        None => String::new(),
    };

    let inserted = DishActive {
        id: NotSet,
        category_id: Set(category_id),
        name: Set(name),
        price: Set(price),
        description: Set(form.description.unwrap_or_default()),
        image_path: Set(image_path.clone()),
        is_available: Set(true),
        sales_count: Set(0),
    }
    .insert(&state.orm)
    .await;

    let dish = match inserted {
        Ok(dish) => dish,
        Err(err) => {
            discard_image(state, &image_path).await;
            return Err(err.into());
        }
    };

    tracing::info!(dish_id = dish.id, "dish created");
    Ok(ApiResponse::success(
        "Dish created",
        dish.into(),
        Some(Meta::empty()),
    ))
}

/// Apply the fields present in the form. A new image replaces and deletes the old file.
pub async fn update_dish(
    state: &AppState,
    _admin: &AdminSession,
    id: i32,
    form: DishForm,
) -> AppResult<ApiResponse<Dish>> {
    let existing = Dishes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let old_image = existing.image_path.clone();

    let mut active: DishActive = existing.into();
    if let Some(name) = form.name {
        active.name = Set(required_text(Some(name), "name")?);
    }
    if let Some(price) = form.price.as_deref() {
        active.price = Set(parse_price(price)?);
    }
    if let Some(description) = form.description {
        active.description = Set(description);
    }
    if let Some(raw) = form.category_id.as_deref() {
        let category_id = parse_category_ref(Some(raw))?;
        if let Some(category_id) = category_id {
            ensure_category(&state.orm, category_id).await?;
        }
        active.category_id = Set(category_id);
    }
    if let Some(flag) = form.is_available.as_deref() {
        active.is_available = Set(parse_flag(flag)?);
    }

    let mut new_image = None;
    if let Some(file) = form.image.as_ref().filter(|f| !f.filename.is_empty()) {
        if let Some(filename) = process_upload_image(file, &state.config.upload_dir).await? {
            active.image_path = Set(filename.clone());
            new_image = Some(filename);
        }
    }

    let dish = match active.update(&state.orm).await {
        Ok(dish) => dish,
        Err(err) => {
            if let Some(filename) = &new_image {
                discard_image(state, filename).await;
            }
            return Err(err.into());
        }
    };

    if new_image.is_some() {
        discard_image(state, &old_image).await;
    }

    tracing::info!(dish_id = dish.id, "dish updated");
    Ok(ApiResponse::success(
        "Dish updated",
        dish.into(),
        Some(Meta::empty()),
    ))
}

/// Delete a dish and its image file. Past order lines keep their snapshot.
pub async fn delete_dish(
    state: &AppState,
    _admin: &AdminSession,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let dish = Dishes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Dishes::delete_by_id(id).exec(&state.orm).await?;
    discard_image(state, &dish.image_path).await;

    tracing::info!(dish_id = id, "dish deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// ─── tables ───

pub async fn list_tables(
    state: &AppState,
    _admin: &AdminSession,
) -> AppResult<ApiResponse<TableList>> {
    let items: Vec<DiningTable> = DiningTables::find()
        .order_by_asc(TableCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(DiningTable::from)
        .collect();
    let total = items.len();
    Ok(ApiResponse::list("Tables", TableList { items }, total))
}

pub async fn create_table(
    state: &AppState,
    _admin: &AdminSession,
    payload: CreateTableRequest,
) -> AppResult<ApiResponse<DiningTable>> {
    let name = required_text(payload.name, "name")?;
    let token = payload
        .qr_code_str
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let table = TableActive {
        id: NotSet,
        name: Set(name),
        qr_code_str: Set(token),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(table_id = table.id, "table created");
    Ok(ApiResponse::success(
        "Table created",
        table.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_table(
    state: &AppState,
    _admin: &AdminSession,
    id: i32,
    payload: UpdateTableRequest,
) -> AppResult<ApiResponse<DiningTable>> {
    let existing = DiningTables::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: TableActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(required_text(Some(name), "name")?);
    }
    if let Some(token) = payload.qr_code_str {
        active.qr_code_str = Set(token);
    }
    let table = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Table updated",
        table.into(),
        Some(Meta::empty()),
    ))
}

/// Delete a table. Its orders remain without a table reference.
pub async fn delete_table(
    state: &AppState,
    _admin: &AdminSession,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = DiningTables::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(table_id = id, "table deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// ─── helpers ───

async fn ensure_category<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    match Categories::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(AppError::bad_request(format!("Unknown category {id}"))),
    }
}

async fn discard_image(state: &AppState, filename: &str) {
    if let Err(err) = remove_upload(&state.config.upload_dir, filename).await {
        tracing::warn!(error = %err, %filename, "failed to remove dish image");
    }
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request(format!("{field} is required")))
}

fn parse_price(raw: &str) -> AppResult<f64> {
    let price = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::bad_request("price must be a number"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::bad_request("price must be a non-negative number"));
    }
    Ok(price)
}

/// Absent or empty means "no category".
fn parse_category_ref(raw: Option<&str>) -> AppResult<Option<i32>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::bad_request("category_id must be an integer")),
    }
}

fn parse_flag(raw: &str) -> AppResult<bool> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AppError::bad_request("is_available must be true or false")),
    }
}
