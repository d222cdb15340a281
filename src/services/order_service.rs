use std::collections::HashMap;

use chrono::Local;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::{
    dto::orders::{CartLine, PlaceOrderRequest, PlacedOrder},
    entity::{
        dining_tables::{Column as TableCol, Entity as DiningTables},
        dishes::{Column as DishCol, Entity as Dishes},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Entity as Orders, Model as OrderModel, OrderStatus},
    },
    error::{AppError, AppResult},
    middleware::auth::TableSession,
    models::{Order, OrderItem, round_money},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Largest quantity accepted on a single cart line.
pub const MAX_LINE_QUANTITY: i32 = 999;

/// Turn a customer cart into a pending order.
///
/// Lines pointing at a missing or unavailable dish are dropped. Every write
/// happens in one transaction; an error anywhere leaves no trace of the order.
pub async fn place_order(
    state: &AppState,
    payload: PlaceOrderRequest,
    table_session: Option<TableSession>,
) -> AppResult<ApiResponse<PlacedOrder>> {
    let lines = match payload.items {
        Some(lines) if !lines.is_empty() => lines,
        _ => return Err(AppError::bad_request("Cart is empty")),
    };
    if lines
        .iter()
        .any(|line| !(1..=MAX_LINE_QUANTITY).contains(&line.quantity))
    {
        return Err(AppError::bad_request("Cart has invalid quantity"));
    }

    let table_id = payload
        .table_id
        .or_else(|| table_session.map(|session| session.table_id));

    let txn = state.orm.begin().await?;

    if let Some(table_id) = table_id {
        let exists = DiningTables::find()
            .filter(TableCol::Id.eq(table_id))
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            return Err(AppError::bad_request(format!("Unknown table {table_id}")));
        }
    }

    let order = OrderActive {
        id: NotSet,
        table_id: Set(table_id),
        total_amount: Set(0.0),
        status: Set(OrderStatus::Pending),
        created_at: Set(Local::now().naive_local()),
        customer_note: Set(payload.note.unwrap_or_default()),
    }
    .insert(&txn)
    .await?;

    let mut total = 0.0;
    let mut accepted = 0usize;
    for line in &lines {
        if let Some(subtotal) = add_line(&txn, order.id, line).await? {
            total += subtotal;
            accepted += 1;
        }
    }

    if accepted == 0 {
        return Err(AppError::bad_request("No available dishes in cart"));
    }

    let total = round_money(total);
    let mut active: OrderActive = order.into();
    active.total_amount = Set(total);
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        order_id = order.id,
        table_id = ?order.table_id,
        lines = accepted,
        total,
        "order placed"
    );

    Ok(ApiResponse::success(
        "Order placed",
        PlacedOrder {
            order_id: order.id,
            total,
        },
        Some(Meta::empty()),
    ))
}

/// Persist one cart line and bump the dish's sales counter.
///
/// Returns the line subtotal, or `None` when the dish cannot be ordered.
async fn add_line<C: ConnectionTrait>(
    db: &C,
    order_id: i32,
    line: &CartLine,
) -> AppResult<Option<f64>> {
    let dish = match Dishes::find_by_id(line.dish_id).one(db).await? {
        Some(dish) if dish.is_available => dish,
        _ => {
            tracing::debug!(order_id, dish_id = line.dish_id, "skipping unavailable dish");
            return Ok(None);
        }
    };

    OrderItemActive {
        id: NotSet,
        order_id: Set(order_id),
        dish_id: Set(Some(dish.id)),
        quantity: Set(line.quantity),
        price_snapshot: Set(dish.price),
    }
    .insert(db)
    .await?;

    Dishes::update_many()
        .col_expr(
            DishCol::SalesCount,
            Expr::col(DishCol::SalesCount).add(i64::from(line.quantity)),
        )
        .filter(DishCol::Id.eq(dish.id))
        .exec(db)
        .await?;

    Ok(Some(dish.price * f64::from(line.quantity)))
}

/// Order status page for customers.
pub async fn get_order(state: &AppState, id: i32) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let order = with_items(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Order", order, Some(Meta::empty())))
}

/// Attach line items and table names to orders, keeping their order.
pub(crate) async fn with_items<C: ConnectionTrait>(
    db: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<Order>> {
    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let table_ids: Vec<i32> = orders.iter().filter_map(|o| o.table_id).collect();

    let mut items: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    let rows = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::Id)
        .find_also_related(Dishes)
        .all(db)
        .await?;
    for (item, dish) in rows {
        items
            .entry(item.order_id)
            .or_default()
            .push(OrderItem::from_entity(item, dish.map(|d| d.name)));
    }

    let tables: HashMap<i32, String> = DiningTables::find()
        .filter(TableCol::Id.is_in(table_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| Order {
            table_name: order.table_id.and_then(|id| tables.get(&id).cloned()),
            items: items.remove(&order.id).unwrap_or_default(),
            id: order.id,
            table_id: order.table_id,
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
            customer_note: order.customer_note,
        })
        .collect())
}
