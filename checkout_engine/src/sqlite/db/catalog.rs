use std::{collections::HashMap, str::FromStr};

use log::trace;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection};

use crate::{
    catalog_objects::ProductQueryFilter,
    db_types::{
        CatalogProduct,
        Category,
        Color,
        Product,
        ProductId,
        Size,
        Store,
        StoreId,
        Variation,
        VariationDetail,
        VariationId,
    },
};

const PRODUCT_COLUMNS: &str = "id, store_id, category_id, name, description, price, is_featured, is_archived, \
                               created_at, updated_at";

pub async fn fetch_store(store_id: &StoreId, conn: &mut SqliteConnection) -> Result<Option<Store>, sqlx::Error> {
    let store = sqlx::query_as("SELECT * FROM stores WHERE id = $1").bind(store_id.as_str()).fetch_optional(conn).await?;
    Ok(store)
}

/// Fetches the products of a store. If `ids` is given, only those products are returned; otherwise the `filter`
/// decides. Products come back newest first, each with its variations in creation order.
pub async fn fetch_products(
    store_id: &StoreId,
    ids: Option<&[ProductId]>,
    filter: &ProductQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<CatalogProduct>, sqlx::Error> {
    if ids.map(|ids| ids.is_empty()).unwrap_or(false) {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE store_id = "));
    builder.push_bind(store_id.clone());
    if let Some(ids) = ids {
        builder.push(" AND id IN (");
        let mut id_list = builder.separated(", ");
        for id in ids {
            id_list.push_bind(id.clone());
        }
        id_list.push_unseparated(")");
    } else {
        if let Some(category_id) = &filter.category_id {
            builder.push(" AND category_id = ");
            builder.push_bind(category_id.clone());
        }
        if let Some(featured) = filter.is_featured {
            builder.push(" AND is_featured = ");
            builder.push_bind(featured);
        }
        if !filter.include_archived {
            builder.push(" AND is_archived = 0");
        }
    }
    builder.push(" ORDER BY created_at DESC, rowid DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let products = builder
        .build()
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(|row| product_from_row(row, ""))
        .collect::<Result<Vec<Product>, sqlx::Error>>()?;
    let product_ids = products.iter().map(|p| p.id.clone()).collect::<Vec<ProductId>>();
    let mut variations = fetch_variations(&product_ids, conn).await?;
    let result = products
        .into_iter()
        .map(|product| {
            let variations = variations.remove(&product.id).unwrap_or_default();
            CatalogProduct { product, variations }
        })
        .collect();
    Ok(result)
}

/// Fetches the variations of the given products, grouped by product, in creation order.
async fn fetch_variations(
    product_ids: &[ProductId],
    conn: &mut SqliteConnection,
) -> Result<HashMap<ProductId, Vec<VariationDetail>>, sqlx::Error> {
    let mut result = HashMap::<ProductId, Vec<VariationDetail>>::new();
    if product_ids.is_empty() {
        return Ok(result);
    }
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        v.id, v.product_id, v.size_id, v.color_id, v.price, v.stock, v.created_at,
        s.id AS s_id, s.store_id AS s_store_id, s.name AS s_name, s.value AS s_value,
        c.id AS c_id, c.store_id AS c_store_id, c.name AS c_name, c.value AS c_value
    FROM variations v
    LEFT JOIN sizes s ON v.size_id = s.id
    LEFT JOIN colors c ON v.color_id = c.id
    WHERE v.product_id IN ("#,
    );
    let mut id_list = builder.separated(", ");
    for id in product_ids {
        id_list.push_bind(id.clone());
    }
    id_list.push_unseparated(")");
    builder.push(" ORDER BY v.created_at ASC, v.rowid ASC");
    let rows = builder.build().fetch_all(conn).await?;
    for row in &rows {
        let variation = variation_from_row(row, "")?;
        let size = match row.try_get::<Option<String>, _>("s_id")? {
            Some(id) => Some(Size {
                id,
                store_id: row.try_get("s_store_id")?,
                name: row.try_get("s_name")?,
                value: row.try_get("s_value")?,
            }),
            None => None,
        };
        let color = match row.try_get::<Option<String>, _>("c_id")? {
            Some(id) => Some(Color {
                id,
                store_id: row.try_get("c_store_id")?,
                name: row.try_get("c_name")?,
                value: row.try_get("c_value")?,
            }),
            None => None,
        };
        result.entry(variation.product_id.clone()).or_default().push(VariationDetail { variation, size, color });
    }
    Ok(result)
}

/// Builds a product from a row whose product columns carry the given prefix, e.g. `p_name` for prefix `p_`.
pub(crate) fn product_from_row(row: &SqliteRow, prefix: &str) -> Result<Product, sqlx::Error> {
    let col = |name: &str| format!("{prefix}{name}");
    Ok(Product {
        id: row.try_get(col("id").as_str())?,
        store_id: row.try_get(col("store_id").as_str())?,
        category_id: row.try_get(col("category_id").as_str())?,
        name: row.try_get(col("name").as_str())?,
        description: row.try_get(col("description").as_str())?,
        price: decimal_from_row(row, &col("price"))?,
        is_featured: row.try_get(col("is_featured").as_str())?,
        is_archived: row.try_get(col("is_archived").as_str())?,
        created_at: row.try_get(col("created_at").as_str())?,
        updated_at: row.try_get(col("updated_at").as_str())?,
    })
}

pub(crate) fn variation_from_row(row: &SqliteRow, prefix: &str) -> Result<Variation, sqlx::Error> {
    let col = |name: &str| format!("{prefix}{name}");
    Ok(Variation {
        id: row.try_get(col("id").as_str())?,
        product_id: row.try_get(col("product_id").as_str())?,
        size_id: row.try_get(col("size_id").as_str())?,
        color_id: row.try_get(col("color_id").as_str())?,
        price: decimal_from_row(row, &col("price"))?,
        stock: row.try_get(col("stock").as_str())?,
        created_at: row.try_get(col("created_at").as_str())?,
    })
}

fn decimal_from_row(row: &SqliteRow, column: &str) -> Result<Option<Decimal>, sqlx::Error> {
    let value = row.try_get::<Option<String>, _>(column)?;
    value
        .map(|s| Decimal::from_str(s.trim()))
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode { index: column.to_string(), source: Box::new(e) })
}

//--------------------------------------   Catalog seeding   ---------------------------------------------------------

pub async fn insert_store(store: &Store, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO stores (id, name, user_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)")
        .bind(store.id.as_str())
        .bind(&store.name)
        .bind(&store.user_id)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_category(category: &Category, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO categories (id, store_id, name) VALUES ($1, $2, $3)")
        .bind(&category.id)
        .bind(category.store_id.as_str())
        .bind(&category.name)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_size(size: &Size, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sizes (id, store_id, name, value) VALUES ($1, $2, $3, $4)")
        .bind(&size.id)
        .bind(size.store_id.as_str())
        .bind(&size.name)
        .bind(&size.value)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_color(color: &Color, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO colors (id, store_id, name, value) VALUES ($1, $2, $3, $4)")
        .bind(&color.id)
        .bind(color.store_id.as_str())
        .bind(&color.name)
        .bind(&color.value)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_product(product: &Product, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO products ({PRODUCT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
    ))
    .bind(product.id.as_str())
    .bind(product.store_id.as_str())
    .bind(&product.category_id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price.map(|p| p.to_string()))
    .bind(product.is_featured)
    .bind(product.is_archived)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_variation(variation: &Variation, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO variations (id, product_id, size_id, color_id, price, stock, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
    )
    .bind(variation.id.as_str())
    .bind(variation.product_id.as_str())
    .bind(variation.size_id.as_deref())
    .bind(variation.color_id.as_deref())
    .bind(variation.price.map(|p| p.to_string()))
    .bind(variation.stock)
    .bind(variation.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Catalog edits replace a product's variations wholesale. Order items that referenced a removed variation keep
/// their captured unit price, but lose the variation reference.
pub async fn delete_variation(variation_id: &VariationId, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM variations WHERE id = $1").bind(variation_id.as_str()).execute(conn).await?;
    Ok(result.rows_affected())
}
