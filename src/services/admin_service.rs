use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::{
        admin::{DashboardStats, RevenuePoint, RevenueTrend},
        orders::{OrderList, OrderListQuery, UpdateOrderStatusRequest},
    },
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, OrderStatus},
    error::{AppError, AppResult},
    middleware::auth::AdminSession,
    models::{Order, round_money},
    response::{ApiResponse, Meta},
    services::order_service::with_items,
    state::AppState,
};

const ALL_ORDERS_LIMIT: u64 = 100;
const BY_STATUS_LIMIT: u64 = 50;
const TREND_DAYS: i64 = 7;

/// Which orders the kitchen board asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    Active,
    All,
    Status(OrderStatus),
}

impl OrderFilter {
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None | Some("active") => Ok(OrderFilter::Active),
            Some("all") => Ok(OrderFilter::All),
            Some(other) => other
                .parse::<OrderStatus>()
                .map(OrderFilter::Status)
                .map_err(AppError::BadRequest),
        }
    }
}

pub async fn list_orders(
    state: &AppState,
    _admin: &AdminSession,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let filter = OrderFilter::parse(query.status.as_deref())?;

    let finder = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id);
    let finder = match filter {
        OrderFilter::Active => finder.filter(OrderCol::Status.is_in(OrderStatus::active())),
        OrderFilter::All => finder.limit(ALL_ORDERS_LIMIT),
        OrderFilter::Status(status) => finder
            .filter(OrderCol::Status.eq(status))
            .limit(BY_STATUS_LIMIT),
    };

    let orders = finder.all(&state.orm).await?;
    let items = with_items(&state.orm, orders).await?;
    let total = items.len();

    Ok(ApiResponse::list("Orders", OrderList { items }, total))
}

pub async fn get_order(
    state: &AppState,
    _admin: &AdminSession,
    id: i32,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let order = with_items(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Order found", order, Some(Meta::empty())))
}

/// Move an order to any status of the closed set. Transition order is not enforced.
pub async fn update_order_status(
    state: &AppState,
    _admin: &AdminSession,
    id: i32,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::bad_request("Invalid order status"))?;

    let previous = existing.status;
    let mut active: OrderActive = existing.into();
    active.status = Set(status);
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = order.id, from = %previous, to = %status, "order status changed");

    let order = with_items(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

pub async fn dashboard_stats(
    state: &AppState,
    admin: &AdminSession,
) -> AppResult<ApiResponse<DashboardStats>> {
    dashboard_stats_on(state, admin, Local::now().date_naive()).await
}

/// Figures for the dashboard as of `today` (local calendar day).
pub async fn dashboard_stats_on(
    state: &AppState,
    _admin: &AdminSession,
    today: NaiveDate,
) -> AppResult<ApiResponse<DashboardStats>> {
    let (start, end) = day_bounds(today);

    let today_revenue = Orders::find()
        .select_only()
        .column_as(Expr::col(OrderCol::TotalAmount).sum(), "revenue")
        .filter(OrderCol::Status.eq(OrderStatus::Paid))
        .filter(OrderCol::CreatedAt.gte(start))
        .filter(OrderCol::CreatedAt.lt(end))
        .into_tuple::<Option<f64>>()
        .one(&state.orm)
        .await?
        .flatten()
        .unwrap_or(0.0);

    let today_orders = Orders::find()
        .filter(OrderCol::CreatedAt.gte(start))
        .filter(OrderCol::CreatedAt.lt(end))
        .count(&state.orm)
        .await?;

    let pending_orders = Orders::find()
        .filter(OrderCol::Status.is_in([OrderStatus::Pending, OrderStatus::Cooking]))
        .count(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Stats",
        DashboardStats {
            today_revenue: round_money(today_revenue),
            today_orders,
            pending_orders,
        },
        Some(Meta::empty()),
    ))
}

pub async fn revenue_trend(
    state: &AppState,
    admin: &AdminSession,
) -> AppResult<ApiResponse<RevenueTrend>> {
    revenue_trend_on(state, admin, Local::now().date_naive()).await
}

/// Paid revenue per calendar day for the week ending on `today`, oldest first.
pub async fn revenue_trend_on(
    state: &AppState,
    _admin: &AdminSession,
    today: NaiveDate,
) -> AppResult<ApiResponse<RevenueTrend>> {
    let first_day = today - Duration::days(TREND_DAYS - 1);
    let (start, _) = day_bounds(first_day);
    let (_, end) = day_bounds(today);

    // created_at is stored as `YYYY-MM-DD HH:MM:SS[.f]`, so the first ten characters are the day.
    let rows: Vec<(String, f64)> = sqlx::query_as(
        r#"
        SELECT substr(created_at, 1, 10) AS day, COALESCE(SUM(total_amount), 0.0) AS revenue
        FROM orders
        WHERE status = ? AND created_at >= ? AND created_at < ?
        GROUP BY day
        "#,
    )
    .bind(OrderStatus::Paid.as_str())
    .bind(start)
    .bind(end)
    .fetch_all(state.sqlite_pool())
    .await?;

    let days = (0..TREND_DAYS)
        .map(|offset| {
            let day = first_day + Duration::days(offset);
            let key = day.format("%Y-%m-%d").to_string();
            let revenue = rows
                .iter()
                .find(|(d, _)| *d == key)
                .map(|(_, revenue)| *revenue)
                .unwrap_or(0.0);
            RevenuePoint {
                date: day.format("%m/%d").to_string(),
                revenue: round_money(revenue),
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Revenue trend",
        RevenueTrend { days },
        Some(Meta::empty()),
    ))
}

fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_filter_defaults_to_active() {
        assert_eq!(OrderFilter::parse(None).unwrap(), OrderFilter::Active);
        assert_eq!(OrderFilter::parse(Some("")).unwrap(), OrderFilter::Active);
        assert_eq!(OrderFilter::parse(Some("all")).unwrap(), OrderFilter::All);
        assert_eq!(
            OrderFilter::parse(Some("Paid")).unwrap(),
            OrderFilter::Status(OrderStatus::Paid)
        );
        assert!(OrderFilter::parse(Some("done")).is_err());
    }

    #[test]
    fn day_bounds_cover_one_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let (start, end) = day_bounds(day);
        assert_eq!(start.to_string(), "2024-02-28 00:00:00");
        assert_eq!(end.to_string(), "2024-02-29 00:00:00");
    }
}
