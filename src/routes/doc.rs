use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            CategoryList, CreateCategoryRequest, CreateTableRequest, DashboardStats, DishForm,
            DishList, RevenuePoint, RevenueTrend, TableList, UpdateCategoryRequest,
            UpdateTableRequest,
        },
        auth::{LoginRequest, LoginResponse, TableSessionQuery, TableSessionResponse},
        menu::{Menu, MenuCategory},
        orders::{CartLine, OrderList, OrderListQuery, PlaceOrderRequest, PlacedOrder, UpdateOrderStatusRequest},
        reviews::{ReviewList, SubmitReviewRequest},
    },
    entity::orders::OrderStatus,
    models::{Category, DiningTable, Dish, Order, OrderItem, Review},
    response::{ApiResponse, Meta},
    routes::{admin, health, menu, orders, reviews},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        menu::get_menu,
        menu::open_table_session,
        orders::place_order,
        orders::get_order,
        reviews::submit_review,
        admin::login,
        admin::stats,
        admin::revenue_trend,
        admin::list_orders,
        admin::get_order,
        admin::update_order_status,
        admin::list_categories,
        admin::create_category,
        admin::update_category,
        admin::delete_category,
        admin::list_dishes,
        admin::create_dish,
        admin::update_dish,
        admin::delete_dish,
        admin::list_tables,
        admin::create_table,
        admin::update_table,
        admin::delete_table,
        admin::list_reviews
    ),
    components(
        schemas(
            Category,
            Dish,
            DiningTable,
            Order,
            OrderItem,
            OrderStatus,
            Review,
            Menu,
            MenuCategory,
            CartLine,
            PlaceOrderRequest,
            PlacedOrder,
            OrderList,
            OrderListQuery,
            UpdateOrderStatusRequest,
            SubmitReviewRequest,
            ReviewList,
            LoginRequest,
            LoginResponse,
            TableSessionQuery,
            TableSessionResponse,
            CategoryList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            DishList,
            DishForm,
            TableList,
            CreateTableRequest,
            UpdateTableRequest,
            DashboardStats,
            RevenuePoint,
            RevenueTrend,
            health::HealthData,
            Meta,
            ApiResponse<Menu>,
            ApiResponse<PlacedOrder>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<Dish>,
            ApiResponse<DashboardStats>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Customer menu and table selection"),
        (name = "Orders", description = "Customer order endpoints"),
        (name = "Reviews", description = "Customer review endpoints"),
        (name = "Admin", description = "Staff endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
