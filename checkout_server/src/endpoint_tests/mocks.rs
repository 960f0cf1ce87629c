use checkout_engine::{
    catalog_objects::ProductQueryFilter,
    db_types::{CatalogProduct, NewOrder, Order, OrderDetail, OrderId, PaymentDetails, ProductId, Store, StoreId},
    order_objects::OrderQueryFilter,
    traits::{
        CatalogError,
        CatalogManagement,
        LedgerError,
        OrderLedger,
        PaymentProcessor,
        PaymentProcessorError,
        PaymentSession,
        PaymentSessionRequest,
    },
};
use chrono::Duration;
use mockall::mock;

mock! {
    pub StoreBackend {}
    impl CatalogManagement for StoreBackend {
        async fn fetch_store(&self, store_id: &StoreId) -> Result<Option<Store>, CatalogError>;
        async fn fetch_products_by_id(&self, store_id: &StoreId, ids: &[ProductId]) -> Result<Vec<CatalogProduct>, CatalogError>;
        async fn fetch_product(&self, store_id: &StoreId, product_id: &ProductId) -> Result<Option<CatalogProduct>, CatalogError>;
        async fn fetch_products_for_store(&self, store_id: &StoreId, query: ProductQueryFilter) -> Result<Vec<CatalogProduct>, CatalogError>;
    }
    impl OrderLedger for StoreBackend {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, LedgerError>;
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, LedgerError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, LedgerError>;
        async fn fetch_order_details(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetail>, LedgerError>;
        async fn attach_payment_session(&self, order_id: &OrderId, session_id: &str) -> Result<Order, LedgerError>;
        async fn mark_order_paid(&self, order_id: &OrderId, details: PaymentDetails) -> Result<Order, LedgerError>;
        async fn abandon_stale_orders(&self, limit: Duration) -> Result<Vec<Order>, LedgerError>;
    }
}

mock! {
    pub Processor {}
    impl PaymentProcessor for Processor {
        async fn create_checkout_session(&self, request: PaymentSessionRequest) -> Result<PaymentSession, PaymentProcessorError>;
    }
}
