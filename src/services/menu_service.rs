use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    dto::menu::{Menu, MenuCategory},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        dishes::{Column as DishCol, Entity as Dishes},
    },
    error::AppResult,
    models::Dish,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Categories in display order, each with its available dishes.
pub async fn menu(state: &AppState) -> AppResult<ApiResponse<Menu>> {
    let categories = Categories::find()
        .order_by_asc(CategoryCol::SortOrder)
        .order_by_asc(CategoryCol::Id)
        .all(&state.orm)
        .await?;

    let mut by_category: HashMap<i32, Vec<Dish>> = HashMap::new();
    let dishes = Dishes::find()
        .filter(DishCol::IsAvailable.eq(true))
        .filter(DishCol::CategoryId.is_not_null())
        .order_by_asc(DishCol::Id)
        .all(&state.orm)
        .await?;
    for dish in dishes {
        if let Some(category_id) = dish.category_id {
            by_category.entry(category_id).or_default().push(dish.into());
        }
    }

    let categories: Vec<MenuCategory> = categories
        .into_iter()
        .map(|category| MenuCategory {
            dishes: by_category.remove(&category.id).unwrap_or_default(),
            id: category.id,
            name: category.name,
            sort_order: category.sort_order,
        })
        .collect();

    Ok(ApiResponse::success(
        "Menu",
        Menu { categories },
        Some(Meta::empty()),
    ))
}
