use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{
    categories, dining_tables, dishes, order_items, orders::OrderStatus, reviews,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Dish {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub price: f64,
    pub description: String,
    /// File name under `/uploads`, empty when the dish has no picture.
    pub image_path: String,
    pub is_available: bool,
    pub sales_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiningTable {
    pub id: i32,
    pub name: String,
    pub qr_code_str: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub dish_id: Option<i32>,
    /// `None` once the dish has been deleted.
    pub dish_name: Option<String>,
    pub quantity: i32,
    pub price_snapshot: f64,
    pub subtotal: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub table_id: Option<i32>,
    pub table_name: Option<String>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub customer_note: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: i32,
    pub order_id: Option<i32>,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sort_order: model.sort_order,
        }
    }
}

impl From<dishes::Model> for Dish {
    fn from(model: dishes::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            price: model.price,
            description: model.description,
            image_path: model.image_path,
            is_available: model.is_available,
            sales_count: model.sales_count,
        }
    }
}

impl From<dining_tables::Model> for DiningTable {
    fn from(model: dining_tables::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            qr_code_str: model.qr_code_str,
        }
    }
}

impl From<reviews::Model> for Review {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

impl OrderItem {
    pub fn from_entity(model: order_items::Model, dish_name: Option<String>) -> Self {
        Self {
            id: model.id,
            dish_id: model.dish_id,
            dish_name,
            quantity: model.quantity,
            price_snapshot: model.price_snapshot,
            subtotal: round_money(model.price_snapshot * f64::from(model.quantity)),
        }
    }
}

/// Round a money amount to two decimals.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
