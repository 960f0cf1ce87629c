use log::*;

use crate::{
    catalog_objects::ProductQueryFilter,
    db_types::{CatalogProduct, ProductId, Store, StoreId},
    shop_api::errors::AccessError,
    traits::{CatalogError, CatalogManagement},
};

/// Store-level catalog reads, plus the ownership check that guards every dashboard operation.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    /// Succeeds with the store record if `user_id` owns `store_id`.
    pub async fn check_store_owner(&self, store_id: &StoreId, user_id: &str) -> Result<Store, AccessError> {
        let store = self.db.fetch_store(store_id).await?.ok_or_else(|| AccessError::StoreNotFound(store_id.clone()))?;
        if store.user_id != user_id {
            warn!("🗃️ User {user_id} tried to access store {store_id}, which they do not own");
            return Err(AccessError::Unauthorized { store_id: store_id.clone(), user_id: user_id.to_string() });
        }
        Ok(store)
    }

    pub async fn products_for_store(
        &self,
        store_id: &StoreId,
        query: ProductQueryFilter,
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        trace!("🗃️ Fetching products for store {store_id}. {query}");
        self.db.fetch_products_for_store(store_id, query).await
    }

    pub async fn product(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<Option<CatalogProduct>, CatalogError> {
        self.db.fetch_product(store_id, product_id).await
    }
}
