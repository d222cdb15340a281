use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, DiningTable, Dish};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub qr_code_str: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTableRequest {
    pub name: Option<String>,
    pub qr_code_str: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TableList {
    #[schema(value_type = Vec<DiningTable>)]
    pub items: Vec<DiningTable>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct DishList {
    #[schema(value_type = Vec<Dish>)]
    pub items: Vec<Dish>,
}

/// A file part received in a multipart form.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Dish fields as sent by the admin multipart form. Values stay textual until validated.
#[derive(Debug, Default, ToSchema)]
pub struct DishForm {
    pub name: Option<String>,
    pub price: Option<String>,
    /// Empty string clears the category.
    pub category_id: Option<String>,
    pub description: Option<String>,
    /// `true` or `false`.
    pub is_available: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<UploadedFile>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub today_revenue: f64,
    pub today_orders: u64,
    pub pending_orders: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevenuePoint {
    /// `MM/DD`
    pub date: String,
    pub revenue: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RevenueTrend {
    #[schema(value_type = Vec<RevenuePoint>)]
    pub days: Vec<RevenuePoint>,
}
