//! Checkout Engine
//!
//! The checkout engine turns storefront carts into persisted, priced orders and hosted payment sessions, and reports
//! the revenue those orders produce. It is storage- and payment-provider-agnostic.
//!
//! The library is divided into three main sections:
//! 1. The backend contracts ([`mod@traits`]). The catalog, the order ledger and the payment processor are all accessed
//!    through traits. A SQLite backend ([`SqliteDatabase`]) ships with the crate; the payment processor is supplied by
//!    the caller.
//! 2. The public API ([`mod@shop_api`]). [`CheckoutApi`] runs the checkout transaction, [`OrderFlowApi`] drives
//!    orders through their lifecycle, [`RevenueApi`] sums paid orders and [`CatalogApi`] serves the catalog and guards
//!    store ownership.
//! 3. Lifecycle events ([`mod@events`]). An event is emitted whenever an order is created, paid or abandoned, and
//!    hooks can be registered to act on them.
//!
//! All monetary amounts are [`Money`](db_types::Money) values, i.e. integer minor units of the store currency.
pub mod db_types;
pub mod events;
pub mod shop_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use shop_api::{
    cart_validator::CartValidator,
    catalog_api::CatalogApi,
    catalog_objects,
    checkout_api::CheckoutApi,
    checkout_objects,
    errors::{AccessError, CheckoutError, ValidationError},
    order_flow_api::OrderFlowApi,
    order_objects,
    pricing,
    revenue_api::{RevenueApi, RevenueReport},
};
#[cfg(feature = "sqlite")]
pub use sqlite::{db, SqliteDatabase};
