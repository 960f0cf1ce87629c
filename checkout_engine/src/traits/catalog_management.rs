use thiserror::Error;

use crate::{
    catalog_objects::ProductQueryFilter,
    db_types::{CatalogProduct, ProductId, Store, StoreId},
};

/// Read access to the store catalog.
///
/// Every product query is scoped to a single store. Products belonging to another store are invisible, even if the
/// caller knows their id.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_store(&self, store_id: &StoreId) -> Result<Option<Store>, CatalogError>;

    /// Fetches the products of the store whose ids are in `ids`, together with their variations in creation order.
    /// Unknown ids are silently skipped; the result order is unspecified.
    async fn fetch_products_by_id(
        &self,
        store_id: &StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<CatalogProduct>, CatalogError>;

    async fn fetch_product(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<Option<CatalogProduct>, CatalogError>;

    /// Fetches the products of a store matching the filter, newest first.
    async fn fetch_products_for_store(
        &self,
        store_id: &StoreId,
        query: ProductQueryFilter,
    ) -> Result<Vec<CatalogProduct>, CatalogError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog database error: {0}")]
    DatabaseError(String),
    #[error("Catalog record is corrupt: {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}
