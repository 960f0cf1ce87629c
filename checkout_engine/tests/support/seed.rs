use std::str::FromStr;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use checkout_engine::{
    db_types::{Category, Color, Product, Size, Store, Variation},
    SqliteDatabase,
};

pub const OWNER: &str = "user_owner";

/// Inserts a store owned by [`OWNER`], together with a default "general" category.
pub async fn store(db: &SqliteDatabase, id: &str) -> Store {
    let store = Store {
        id: id.into(),
        name: format!("Store {id}"),
        user_id: OWNER.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    db.insert_store(&store).await.expect("Error inserting store");
    let category = Category { id: category_id(id), store_id: id.into(), name: "General".into() };
    db.insert_category(&category).await.expect("Error inserting category");
    store
}

pub fn category_id(store_id: &str) -> String {
    format!("{store_id}_general")
}

fn price(p: Option<&str>) -> Option<Decimal> {
    p.map(|p| Decimal::from_str(p).expect("Invalid price"))
}

/// Inserts a product. `age` pushes the creation time into the past so listings have a predictable order.
pub async fn product(db: &SqliteDatabase, store_id: &str, id: &str, base_price: Option<&str>, age: i64) -> Product {
    let created_at = Utc::now() - Duration::seconds(age);
    let product = Product {
        id: id.into(),
        store_id: store_id.into(),
        category_id: category_id(store_id),
        name: format!("Product {id}"),
        description: String::default(),
        price: price(base_price),
        is_featured: false,
        is_archived: false,
        created_at,
        updated_at: created_at,
    };
    db.insert_product(&product).await.expect("Error inserting product");
    product
}

pub async fn variation(db: &SqliteDatabase, product_id: &str, id: &str, own_price: Option<&str>) -> Variation {
    let variation = Variation {
        id: id.into(),
        product_id: product_id.into(),
        size_id: None,
        color_id: None,
        price: price(own_price),
        stock: 10,
        created_at: Utc::now(),
    };
    db.insert_variation(&variation).await.expect("Error inserting variation");
    variation
}

/// Inserts a variation with a size and a color, creating both.
pub async fn labelled_variation(
    db: &SqliteDatabase,
    store_id: &str,
    product_id: &str,
    id: &str,
    own_price: Option<&str>,
    size: &str,
    color: &str,
) -> Variation {
    let size = Size { id: format!("{id}_size"), store_id: store_id.into(), name: size.into(), value: size.into() };
    let color = Color { id: format!("{id}_color"), store_id: store_id.into(), name: color.into(), value: "#000".into() };
    db.insert_size(&size).await.expect("Error inserting size");
    db.insert_color(&color).await.expect("Error inserting color");
    let variation = Variation {
        id: id.into(),
        product_id: product_id.into(),
        size_id: Some(size.id),
        color_id: Some(color.id),
        price: price(own_price),
        stock: 10,
        created_at: Utc::now(),
    };
    db.insert_variation(&variation).await.expect("Error inserting variation");
    variation
}
