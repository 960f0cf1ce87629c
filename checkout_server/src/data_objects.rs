use checkout_engine::{
    catalog_objects::ProductQueryFilter,
    checkout_objects::CartItem,
    db_types::OrderStatusType,
    order_objects::OrderQueryFilter,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The body of a checkout request. A missing `items` field is treated as an empty cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Query parameters for the public product listing. Archived products are never listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub category_id: Option<String>,
    pub is_featured: Option<bool>,
}

impl From<ProductListParams> for ProductQueryFilter {
    fn from(params: ProductListParams) -> Self {
        ProductQueryFilter { category_id: params.category_id, is_featured: params.is_featured, include_archived: false }
    }
}

/// Query parameters for the dashboard order listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListParams {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub status: Option<OrderStatusType>,
}

impl From<OrderListParams> for OrderQueryFilter {
    fn from(params: OrderListParams) -> Self {
        let mut query = OrderQueryFilter::default();
        if let Some(since) = params.since {
            query = query.since(since);
        }
        if let Some(until) = params.until {
            query = query.until(until);
        }
        if let Some(status) = params.status {
            query = query.with_status(status);
        }
        query
    }
}
