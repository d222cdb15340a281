use chrono::{Duration, Local, NaiveTime};
use rand::{Rng, seq::SliceRandom};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait};
use table_order_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        categories::ActiveModel as CategoryActive,
        dining_tables::ActiveModel as TableActive,
        dishes::{ActiveModel as DishActive, Entity as Dishes},
        order_items::ActiveModel as OrderItemActive,
        orders::{ActiveModel as OrderActive, OrderStatus},
        reviews::ActiveModel as ReviewActive,
        Categories,
    },
    models::round_money,
};

const MENU: &[(&str, &[(&str, f64, &str)])] = &[
    (
        "Signature",
        &[
            ("Braised Pork Belly", 48.0, "Slow-braised pork belly, rich but not greasy"),
            ("Chef's Fish Head", 58.0, "Whole fish head in house chili sauce"),
            ("Dry-Pot Bullfrog", 52.0, "Numbing and spicy bullfrog"),
            ("Black Pepper Beef", 56.0, "Sizzling beef with black pepper sauce"),
        ],
    ),
    (
        "Steamed",
        &[
            ("Steamed Pork with Rice Flour", 38.0, "Rice-flour coated pork, melts in the mouth"),
            ("Steamed Spare Ribs", 42.0, "Tender ribs steamed in rice flour"),
            ("Steamed Sea Bass", 55.0, "Fresh sea bass with scallion and soy"),
        ],
    ),
    (
        "Home Style",
        &[
            ("Farmhouse Pork Stir-Fry", 32.0, "Green chili and pork"),
            ("Cured Pork with Garlic Shoots", 35.0, "Smoky cured pork, crisp shoots"),
            ("Tomato and Egg", 18.0, "Sweet and sour classic"),
            ("Mapo Tofu", 22.0, "Spicy tofu with minced beef"),
            ("Hot and Sour Potato Strips", 16.0, "Crunchy shredded potato"),
        ],
    ),
    (
        "Cold Dishes",
        &[
            ("Smashed Cucumber", 12.0, "Garlic and vinegar dressing"),
            ("Century Egg Tofu", 15.0, "Silken tofu with preserved egg"),
            ("Mouth-Watering Chicken", 28.0, "Poached chicken in chili oil"),
        ],
    ),
    (
        "Soups",
        &[
            ("Tomato Egg Drop Soup", 15.0, "Light and tangy"),
            ("Pork Rib and Lotus Root Soup", 38.0, "Slow-simmered with lotus root"),
            ("Fish Head Tofu Soup", 35.0, "Milky white broth"),
        ],
    ),
    (
        "Staples",
        &[
            ("Steamed Rice", 3.0, "Per bowl"),
            ("Egg Fried Rice", 15.0, "Wok-fried with egg and scallion"),
            ("Hand-Pulled Noodles", 12.0, "Made to order"),
        ],
    ),
    (
        "Drinks",
        &[
            ("Cola / Sprite", 5.0, "Chilled can"),
            ("Herbal Tea", 6.0, "Sweet herbal tea"),
            ("Mineral Water", 3.0, "Still water"),
        ],
    ),
];

const COMMENTS: &[&str] = &[
    "Delicious, will come again!",
    "Generous portions.",
    "Friendly service.",
    "The steamed pork is amazing.",
    "Could be a bit quieter.",
    "Waited too long for the food.",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = AppConfig::database_url_from_env();
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    if Categories::find().count(&orm).await? > 0 {
        println!("Database already has data, skipping seed");
        return Ok(());
    }

    seed_menu(&orm).await?;
    seed_tables(&orm).await?;
    seed_history(&orm).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_menu(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    for (position, (category, dishes)) in MENU.iter().enumerate() {
        let category = CategoryActive {
            id: NotSet,
            name: Set(category.to_string()),
            sort_order: Set(position as i32 + 1),
        }
        .insert(orm)
        .await?;

        for (name, price, description) in dishes.iter() {
            DishActive {
                id: NotSet,
                category_id: Set(Some(category.id)),
                name: Set(name.to_string()),
                price: Set(*price),
                description: Set(description.to_string()),
                image_path: Set(String::new()),
                is_available: Set(true),
                sales_count: Set(rng.gen_range(10..=200)),
            }
            .insert(orm)
            .await?;
        }
    }
    println!("Seeded {} categories", MENU.len());
    Ok(())
}

async fn seed_tables(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let mut names: Vec<String> = (1..=10).map(|i| format!("Table {i}")).collect();
    names.push("Private Room A".into());
    names.push("Private Room B".into());

    for (index, name) in names.iter().enumerate() {
        TableActive {
            id: NotSet,
            name: Set(name.clone()),
            qr_code_str: Set(format!("table={}", index + 1)),
        }
        .insert(orm)
        .await?;
    }
    println!("Seeded {} tables", names.len());
    Ok(())
}

/// A week of paid orders and some reviews, so the dashboard has something to show.
async fn seed_history(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let dishes = Dishes::find().all(orm).await?;
    let mut rng = rand::thread_rng();
    let today = Local::now().date_naive();
    let txn = orm.begin().await?;

    let mut order_count = 0;
    for day_offset in 0..7 {
        let day = today - Duration::days(day_offset);
        for _ in 0..rng.gen_range(8..=25) {
            let time = NaiveTime::from_hms_opt(rng.gen_range(10..=21), rng.gen_range(0..60), 0)
                .unwrap_or(NaiveTime::MIN);
            let order = OrderActive {
                id: NotSet,
                table_id: Set(Some(rng.gen_range(1..=10))),
                total_amount: Set(0.0),
                status: Set(OrderStatus::Paid),
                created_at: Set(day.and_time(time)),
                customer_note: Set(String::new()),
            }
            .insert(&txn)
            .await?;

            let mut total = 0.0;
            let picks = rng.gen_range(2..=5);
            for dish in dishes.choose_multiple(&mut rng, picks) {
                let quantity = rng.gen_range(1..=3);
                OrderItemActive {
                    id: NotSet,
                    order_id: Set(order.id),
                    dish_id: Set(Some(dish.id)),
                    quantity: Set(quantity),
                    price_snapshot: Set(dish.price),
                }
                .insert(&txn)
                .await?;
                total += dish.price * f64::from(quantity);
            }

            let mut active: OrderActive = order.into();
            active.total_amount = Set(round_money(total));
            active.update(&txn).await?;
            order_count += 1;
        }
    }

    for _ in 0..10 {
        let ratings = [4, 4, 5, 5, 5, 3, 2];
        ReviewActive {
            id: NotSet,
            order_id: Set(Some(rng.gen_range(1..=20))),
            rating: Set(*ratings.choose(&mut rng).unwrap_or(&5)),
            comment: Set(COMMENTS.choose(&mut rng).unwrap_or(&"").to_string()),
            created_at: Set(Local::now().naive_local() - Duration::days(rng.gen_range(0..=7))),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    println!("Seeded {order_count} paid orders and 10 reviews");
    Ok(())
}
