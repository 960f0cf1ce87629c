//! `SqliteDatabase` is a concrete implementation of a checkout engine backend.
//!
//! It uses SQLite as the backend and implements all the traits defined in the [`traits`](crate::traits) module.
use std::fmt::Debug;

use chrono::{Duration, Utc};
use log::*;
use sqlx::SqlitePool;

use super::db::{catalog, db_url, new_pool, orders};
use crate::{
    catalog_objects::ProductQueryFilter,
    db_types::{
        CatalogProduct,
        Category,
        Color,
        NewOrder,
        Order,
        OrderDetail,
        OrderId,
        PaymentDetails,
        Product,
        ProductId,
        Size,
        Store,
        StoreId,
        Variation,
        VariationId,
    },
    order_objects::OrderQueryFilter,
    traits::{CatalogError, CatalogManagement, LedgerError, OrderLedger},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({})", self.url)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_store(&self, store_id: &StoreId) -> Result<Option<Store>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let store = catalog::fetch_store(store_id, &mut conn).await?;
        Ok(store)
    }

    async fn fetch_products_by_id(
        &self,
        store_id: &StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let filter = ProductQueryFilter::default().including_archived();
        let products = catalog::fetch_products(store_id, Some(ids), &filter, &mut conn).await?;
        trace!("🗃️ {} of {} requested products found in store {store_id}", products.len(), ids.len());
        Ok(products)
    }

    async fn fetch_product(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<Option<CatalogProduct>, CatalogError> {
        let products = self.fetch_products_by_id(store_id, std::slice::from_ref(product_id)).await?;
        if products.len() > 1 {
            return Err(CatalogError::CorruptRecord(format!("Product {product_id} appears {} times", products.len())));
        }
        Ok(products.into_iter().next())
    }

    async fn fetch_products_for_store(
        &self,
        store_id: &StoreId,
        query: ProductQueryFilter,
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        trace!("🗃️ Fetching products for store {store_id} where {query}");
        let products = catalog::fetch_products(store_id, None, &query, &mut conn).await?;
        Ok(products)
    }
}

impl OrderLedger for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order {} has been saved in the DB", order.id);
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_order_details(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetail>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let details = orders::fetch_order_details(query, &mut conn).await?;
        Ok(details)
    }

    async fn attach_payment_session(&self, order_id: &OrderId, session_id: &str) -> Result<Order, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::set_payment_session(order_id, session_id, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn mark_order_paid(&self, order_id: &OrderId, details: PaymentDetails) -> Result<Order, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::mark_paid(order_id, details, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ Order {order_id} has been marked as paid");
        Ok(order)
    }

    async fn abandon_stale_orders(&self, limit: Duration) -> Result<Vec<Order>, LedgerError> {
        let cutoff = Utc::now().checked_sub_signed(limit).ok_or(LedgerError::TimeoutOutOfRange(limit))?;
        let mut tx = self.pool.begin().await?;
        let orders = orders::abandon_orders_before(cutoff, &mut tx).await?;
        tx.commit().await?;
        if !orders.is_empty() {
            debug!("🗃️ {} orders not updated since {cutoff} have been abandoned", orders.len());
        }
        Ok(orders)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    // The catalog is owned by the storefront admin. These writers exist to seed stores and fixtures.

    pub async fn insert_store(&self, store: &Store) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_store(store, &mut conn).await?;
        Ok(())
    }

    pub async fn insert_category(&self, category: &Category) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_category(category, &mut conn).await?;
        Ok(())
    }

    pub async fn insert_size(&self, size: &Size) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_size(size, &mut conn).await?;
        Ok(())
    }

    pub async fn insert_color(&self, color: &Color) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_color(color, &mut conn).await?;
        Ok(())
    }

    pub async fn insert_product(&self, product: &Product) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_product(product, &mut conn).await?;
        Ok(())
    }

    pub async fn insert_variation(&self, variation: &Variation) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_variation(variation, &mut conn).await?;
        Ok(())
    }

    pub async fn delete_variation(&self, variation_id: &VariationId) -> Result<bool, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = catalog::delete_variation(variation_id, &mut conn).await?;
        Ok(deleted > 0)
    }
}
