pub mod categories;
pub mod dining_tables;
pub mod dishes;
pub mod order_items;
pub mod orders;
pub mod reviews;

pub use categories::Entity as Categories;
pub use dining_tables::Entity as DiningTables;
pub use dishes::Entity as Dishes;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use reviews::Entity as Reviews;
