#![allow(dead_code)]

use chrono::{Local, NaiveDateTime};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use table_order_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        categories::ActiveModel as CategoryActive,
        dining_tables::ActiveModel as TableActive,
        dishes::{ActiveModel as DishActive, Model as DishModel},
        orders::{ActiveModel as OrderActive, OrderStatus},
    },
    middleware::auth::AdminSession,
    state::AppState,
};
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "letmein";
pub const SESSION_SECRET: &str = "test-secret";

/// Fresh in-memory database with migrations applied. Keep the `TempDir` alive for uploads.
pub async fn setup_state() -> anyhow::Result<(AppState, TempDir)> {
    let uploads = tempfile::tempdir()?;
    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        admin_password: ADMIN_PASSWORD.into(),
        session_secret: SESSION_SECRET.into(),
        upload_dir: uploads.path().to_path_buf(),
        max_upload_bytes: 16 * 1024 * 1024,
    };

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    Ok((AppState::new(orm, config)?, uploads))
}

pub fn admin() -> AdminSession {
    AdminSession {
        subject: "admin".into(),
    }
}

pub async fn create_category(state: &AppState, name: &str, sort_order: i32) -> anyhow::Result<i32> {
    let category = CategoryActive {
        id: NotSet,
        name: Set(name.into()),
        sort_order: Set(sort_order),
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

pub async fn create_dish(
    state: &AppState,
    category_id: Option<i32>,
    name: &str,
    price: f64,
    is_available: bool,
) -> anyhow::Result<DishModel> {
    let dish = DishActive {
        id: NotSet,
        category_id: Set(category_id),
        name: Set(name.into()),
        price: Set(price),
        description: Set(String::new()),
        image_path: Set(String::new()),
        is_available: Set(is_available),
        sales_count: Set(0),
    }
    .insert(&state.orm)
    .await?;
    Ok(dish)
}

pub async fn create_table(state: &AppState, name: &str) -> anyhow::Result<i32> {
    let table = TableActive {
        id: NotSet,
        name: Set(name.into()),
        qr_code_str: Set(format!("qr-{name}")),
    }
    .insert(&state.orm)
    .await?;
    Ok(table.id)
}

/// Insert an order directly, bypassing the cart flow.
pub async fn insert_order(
    state: &AppState,
    status: OrderStatus,
    total_amount: f64,
    created_at: NaiveDateTime,
) -> anyhow::Result<i32> {
    let order = OrderActive {
        id: NotSet,
        table_id: Set(None),
        total_amount: Set(total_amount),
        status: Set(status),
        created_at: Set(created_at),
        customer_note: Set(String::new()),
    }
    .insert(&state.orm)
    .await?;
    Ok(order.id)
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
