mod common;

use std::io::Cursor;

use chrono::{Duration, Local, NaiveTime};
use image::{ImageBuffer, ImageFormat, Rgb};
use sea_orm::{EntityTrait, PaginatorTrait};
use table_order_api::{
    dto::{
        admin::{
            CreateCategoryRequest, CreateTableRequest, DishForm, UpdateCategoryRequest,
            UpdateTableRequest, UploadedFile,
        },
        orders::{CartLine, OrderListQuery, PlaceOrderRequest, UpdateOrderStatusRequest},
    },
    entity::{
        categories::Entity as Categories,
        dishes::Entity as Dishes,
        orders::{Entity as Orders, OrderStatus},
    },
    error::AppError,
    services::{admin_service, catalog_service, order_service},
    upload::TARGET_SIZE,
};

fn png_upload(name: &str, width: u32, height: u32) -> anyhow::Result<UploadedFile> {
    let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 80, 40]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(UploadedFile {
        filename: name.into(),
        bytes,
    })
}

#[tokio::test]
async fn deleting_category_detaches_its_dishes() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();

    let category = catalog_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Soups".into(),
            sort_order: Some(5),
        },
    )
    .await?
    .data
    .expect("category");
    let soup = common::create_dish(&state, Some(category.id), "Lotus Root Soup", 38.0, true).await?;
    let broth = common::create_dish(&state, Some(category.id), "Fish Broth", 35.0, true).await?;

    catalog_service::delete_category(&state, &admin, category.id).await?;

    assert_eq!(Categories::find().count(&state.orm).await?, 0);
    for id in [soup.id, broth.id] {
        let dish = Dishes::find_by_id(id).one(&state.orm).await?.expect("dish survives");
        assert_eq!(dish.category_id, None);
    }

    let again = catalog_service::delete_category(&state, &admin, category.id).await;
    assert!(matches!(again, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn category_crud_keeps_display_order() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();

    let staples = common::create_category(&state, "Staples", 6).await?;
    common::create_category(&state, "Cold Dishes", 4).await?;

    catalog_service::update_category(
        &state,
        &admin,
        staples,
        UpdateCategoryRequest {
            name: Some("Rice & Noodles".into()),
            sort_order: Some(1),
        },
    )
    .await?;

    let listed = catalog_service::list_categories(&state, &admin)
        .await?
        .data
        .expect("categories");
    let names: Vec<&str> = listed.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Rice & Noodles", "Cold Dishes"]);

    let blank = catalog_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "  ".into(),
            sort_order: None,
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    let missing =
        catalog_service::update_category(&state, &admin, 404, UpdateCategoryRequest::default()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn status_can_move_anywhere_within_the_set() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();
    let id = common::insert_order(&state, OrderStatus::Pending, 20.0, common::now()).await?;

    for status in ["Cooking", "Served", "Paid", "Pending", "Cancelled"] {
        let order = admin_service::update_order_status(
            &state,
            &admin,
            id,
            UpdateOrderStatusRequest {
                status: status.into(),
            },
        )
        .await?
        .data
        .expect("order");
        assert_eq!(order.status.as_str(), status);
    }
    Ok(())
}

#[tokio::test]
async fn invalid_status_is_rejected_and_leaves_order_alone() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();
    let id = common::insert_order(&state, OrderStatus::Cooking, 20.0, common::now()).await?;

    for bad in ["Shipped", "paid", ""] {
        let result = admin_service::update_order_status(
            &state,
            &admin,
            id,
            UpdateOrderStatusRequest { status: bad.into() },
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    let order = Orders::find_by_id(id).one(&state.orm).await?.expect("order");
    assert_eq!(order.status, OrderStatus::Cooking);

    let missing = admin_service::update_order_status(
        &state,
        &admin,
        id + 100,
        UpdateOrderStatusRequest {
            status: "Paid".into(),
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn order_listing_filters() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();
    let now = common::now();
    common::insert_order(&state, OrderStatus::Pending, 10.0, now).await?;
    common::insert_order(&state, OrderStatus::Served, 11.0, now).await?;
    common::insert_order(&state, OrderStatus::Paid, 12.0, now).await?;
    common::insert_order(&state, OrderStatus::Cancelled, 13.0, now).await?;

    let list = |status: Option<&str>| OrderListQuery {
        status: status.map(String::from),
    };

    let active = admin_service::list_orders(&state, &admin, list(None)).await?;
    assert_eq!(active.meta.and_then(|m| m.total), Some(2));

    let all = admin_service::list_orders(&state, &admin, list(Some("all")))
        .await?
        .data
        .expect("orders");
    assert_eq!(all.items.len(), 4);

    let paid = admin_service::list_orders(&state, &admin, list(Some("Paid")))
        .await?
        .data
        .expect("orders");
    assert_eq!(paid.items.len(), 1);
    assert_eq!(paid.items[0].total_amount, 12.0);

    let bogus = admin_service::list_orders(&state, &admin, list(Some("late"))).await;
    assert!(matches!(bogus, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn dashboard_counts_only_todays_paid_revenue() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();
    let today = Local::now().date_naive();
    let noon = today.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("noon"));

    common::insert_order(&state, OrderStatus::Paid, 100.25, noon).await?;
    common::insert_order(&state, OrderStatus::Paid, 50.5, noon).await?;
    common::insert_order(&state, OrderStatus::Pending, 70.0, noon).await?;
    common::insert_order(&state, OrderStatus::Cooking, 30.0, noon).await?;
    common::insert_order(&state, OrderStatus::Paid, 999.0, noon - Duration::days(1)).await?;
    common::insert_order(&state, OrderStatus::Pending, 1.0, noon - Duration::days(3)).await?;

    let stats = admin_service::dashboard_stats_on(&state, &admin, today)
        .await?
        .data
        .expect("stats");
    assert_eq!(stats.today_revenue, 150.75);
    assert_eq!(stats.today_orders, 4);
    assert_eq!(stats.pending_orders, 3);
    Ok(())
}

#[tokio::test]
async fn revenue_trend_buckets_paid_orders_by_day() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();
    let today = Local::now().date_naive();
    let at = |days_ago: i64, hour: u32| {
        (today - Duration::days(days_ago)).and_time(NaiveTime::from_hms_opt(hour, 30, 0).expect("time"))
    };

    common::insert_order(&state, OrderStatus::Paid, 10.0, at(0, 9)).await?;
    common::insert_order(&state, OrderStatus::Paid, 15.5, at(0, 20)).await?;
    common::insert_order(&state, OrderStatus::Paid, 40.0, at(6, 13)).await?;
    common::insert_order(&state, OrderStatus::Cancelled, 80.0, at(2, 13)).await?;
    common::insert_order(&state, OrderStatus::Paid, 500.0, at(7, 13)).await?;

    let trend = admin_service::revenue_trend_on(&state, &admin, today)
        .await?
        .data
        .expect("trend");
    assert_eq!(trend.days.len(), 7);
    assert_eq!(
        trend.days[0].date,
        (today - Duration::days(6)).format("%m/%d").to_string()
    );
    assert_eq!(trend.days[0].revenue, 40.0);
    assert_eq!(trend.days[4].revenue, 0.0);
    assert_eq!(trend.days[6].date, today.format("%m/%d").to_string());
    assert_eq!(trend.days[6].revenue, 25.5);
    Ok(())
}

#[tokio::test]
async fn dish_image_lifecycle() -> anyhow::Result<()> {
    let (state, uploads) = common::setup_state().await?;
    let admin = common::admin();
    let category = common::create_category(&state, "Signature", 1).await?;

    let dish = catalog_service::create_dish(
        &state,
        &admin,
        DishForm {
            name: Some("Dry-Pot Bullfrog".into()),
            price: Some("52".into()),
            category_id: Some(category.to_string()),
            description: Some("Spicy".into()),
            is_available: None,
            image: Some(png_upload("frog.PNG", 300, 200)?),
        },
    )
    .await?
    .data
    .expect("dish");
    assert!(dish.image_path.ends_with(".jpg"));
    assert!(dish.is_available);
    assert_eq!(dish.category_id, Some(category));

    let first_path = uploads.path().join(&dish.image_path);
    let stored = image::open(&first_path)?;
    assert_eq!((stored.width(), stored.height()), (TARGET_SIZE, TARGET_SIZE));

    let updated = catalog_service::update_dish(
        &state,
        &admin,
        dish.id,
        DishForm {
            price: Some("55.5".into()),
            category_id: Some(String::new()),
            is_available: Some("false".into()),
            image: Some(png_upload("frog2.webp.png", 100, 400)?),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("dish");
    assert_eq!(updated.price, 55.5);
    assert_eq!(updated.category_id, None);
    assert!(!updated.is_available);
    assert_eq!(updated.name, "Dry-Pot Bullfrog");
    assert_ne!(updated.image_path, dish.image_path);
    assert!(!first_path.exists());
    let second_path = uploads.path().join(&updated.image_path);
    assert!(second_path.exists());

    catalog_service::delete_dish(&state, &admin, dish.id).await?;
    assert!(!second_path.exists());
    assert!(Dishes::find_by_id(dish.id).one(&state.orm).await?.is_none());

    let missing = catalog_service::delete_dish(&state, &admin, dish.id).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn disallowed_upload_leaves_dish_without_image() -> anyhow::Result<()> {
    let (state, uploads) = common::setup_state().await?;
    let admin = common::admin();

    let dish = catalog_service::create_dish(
        &state,
        &admin,
        DishForm {
            name: Some("Rice".into()),
            price: Some("3".into()),
            image: Some(UploadedFile {
                filename: "menu.pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
            }),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("dish");
    assert_eq!(dish.image_path, "");
    assert_eq!(std::fs::read_dir(uploads.path())?.count(), 0);

    let garbage = catalog_service::create_dish(
        &state,
        &admin,
        DishForm {
            name: Some("Noodles".into()),
            price: Some("12".into()),
            image: Some(UploadedFile {
                filename: "noodles.jpg".into(),
                bytes: b"not an image".to_vec(),
            }),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(garbage, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn dish_form_validation() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();

    let no_name = catalog_service::create_dish(
        &state,
        &admin,
        DishForm {
            price: Some("10".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(no_name, Err(AppError::BadRequest(_))));

    let bad_category = catalog_service::create_dish(
        &state,
        &admin,
        DishForm {
            name: Some("Tofu".into()),
            price: Some("10".into()),
            category_id: Some("42".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_category, Err(AppError::BadRequest(_))));

    let missing = catalog_service::update_dish(&state, &admin, 42, DishForm::default()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    assert_eq!(Dishes::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn deleting_dish_keeps_order_history() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();
    let dish = common::create_dish(&state, None, "Cucumber", 12.0, true).await?;

    let placed = order_service::place_order(
        &state,
        PlaceOrderRequest {
            items: Some(vec![CartLine {
                dish_id: dish.id,
                quantity: 2,
            }]),
            ..Default::default()
        },
        None,
    )
    .await?
    .data
    .expect("placed order");

    catalog_service::delete_dish(&state, &admin, dish.id).await?;

    let order = admin_service::get_order(&state, &admin, placed.order_id)
        .await?
        .data
        .expect("order");
    assert_eq!(order.total_amount, 24.0);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].dish_id, None);
    assert_eq!(order.items[0].dish_name, None);
    assert_eq!(order.items[0].price_snapshot, 12.0);
    Ok(())
}

#[tokio::test]
async fn table_crud() -> anyhow::Result<()> {
    let (state, _uploads) = common::setup_state().await?;
    let admin = common::admin();

    let generated = catalog_service::create_table(
        &state,
        &admin,
        CreateTableRequest {
            name: Some("Table 1".into()),
            qr_code_str: None,
        },
    )
    .await?
    .data
    .expect("table");
    assert!(!generated.qr_code_str.is_empty());

    let explicit = catalog_service::create_table(
        &state,
        &admin,
        CreateTableRequest {
            name: Some("Private Room A".into()),
            qr_code_str: Some("table=11".into()),
        },
    )
    .await?
    .data
    .expect("table");
    assert_eq!(explicit.qr_code_str, "table=11");

    let nameless = catalog_service::create_table(
        &state,
        &admin,
        CreateTableRequest {
            name: None,
            qr_code_str: None,
        },
    )
    .await;
    assert!(matches!(nameless, Err(AppError::BadRequest(_))));

    let renamed = catalog_service::update_table(
        &state,
        &admin,
        explicit.id,
        UpdateTableRequest {
            name: Some("Private Room B".into()),
            qr_code_str: None,
        },
    )
    .await?
    .data
    .expect("table");
    assert_eq!(renamed.name, "Private Room B");
    assert_eq!(renamed.qr_code_str, "table=11");

    let order_id = {
        let dish = common::create_dish(&state, None, "Water", 3.0, true).await?;
        order_service::place_order(
            &state,
            PlaceOrderRequest {
                items: Some(vec![CartLine {
                    dish_id: dish.id,
                    quantity: 1,
                }]),
                table_id: Some(generated.id),
                note: None,
            },
            None,
        )
        .await?
        .data
        .expect("placed order")
        .order_id
    };

    catalog_service::delete_table(&state, &admin, generated.id).await?;
    let order = Orders::find_by_id(order_id).one(&state.orm).await?.expect("order survives");
    assert_eq!(order.table_id, None);

    let tables = catalog_service::list_tables(&state, &admin)
        .await?
        .data
        .expect("tables");
    assert_eq!(tables.items.len(), 1);

    let missing = catalog_service::delete_table(&state, &admin, generated.id).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}
