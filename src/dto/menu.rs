use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Dish;

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuCategory {
    pub id: i32,
    pub name: String,
    pub sort_order: i32,
    pub dishes: Vec<Dish>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Menu {
    #[schema(value_type = Vec<MenuCategory>)]
    pub categories: Vec<MenuCategory>,
}
