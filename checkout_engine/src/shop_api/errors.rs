use thiserror::Error;

use crate::{
    db_types::{OrderId, ProductId, StoreId, VariationId},
    traits::{CatalogError, LedgerError, PaymentProcessorError},
};

/// Problems with the cart itself. These are the buyer's (or the storefront's) fault and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Items are required")]
    EmptyCart,
    #[error("A cart may hold at most {max} items, not {count}")]
    TooManyItems { count: usize, max: usize },
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),
    #[error("Invalid product or variation: {0}")]
    UnknownProduct(ProductId),
    #[error("Invalid product or variation: variation {variation_id} does not belong to product {product_id}")]
    UnknownVariation { product_id: ProductId, variation_id: VariationId },
    #[error("Product {0} has no variations available")]
    NoVariationAvailable(ProductId),
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Could not read the catalog. {0}")]
    Catalog(#[from] CatalogError),
    #[error("Could not save the order. {0}")]
    Ledger(#[from] LedgerError),
    #[error("Order {order_id} was saved, but no payment session could be created. {source}")]
    PaymentSession { order_id: OrderId, source: PaymentProcessorError },
}

impl CheckoutError {
    pub fn is_validation_error(&self) -> bool {
        matches!(self, CheckoutError::Validation(_))
    }

    /// The order left behind by a failed checkout, if one was committed before the failure.
    pub fn orphaned_order(&self) -> Option<&OrderId> {
        match self {
            CheckoutError::PaymentSession { order_id, .. } => Some(order_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AccessError {
    #[error("Store {0} does not exist")]
    StoreNotFound(StoreId),
    #[error("User {user_id} is not authorized to manage store {store_id}")]
    Unauthorized { store_id: StoreId, user_id: String },
    #[error("{0}")]
    Catalog(#[from] CatalogError),
}
