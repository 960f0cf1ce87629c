//! # Backend contracts
//!
//! The engine never talks to a storage engine or a payment processor directly. Instead, the APIs in
//! [`crate::shop_api`] are generic over the traits defined here, and concrete backends (e.g.
//! [`crate::SqliteDatabase`]) implement them.
//!
//! * [`CatalogManagement`] provides read access to stores, products and their variations.
//! * [`OrderLedger`] persists orders and their items, and is the single source of truth for revenue.
//! * [`StoreDatabase`] is shorthand for a backend that provides both.
//! * [`PaymentProcessor`] creates hosted payment sessions with an external provider.
mod catalog_management;
mod data_objects;
mod order_ledger;
mod payment_processor;

pub use catalog_management::{CatalogError, CatalogManagement};
pub use data_objects::{PaymentLineItem, PaymentSession, PaymentSessionRequest};
pub use order_ledger::{LedgerError, OrderLedger};
pub use payment_processor::{PaymentProcessor, PaymentProcessorError};

/// A backend that serves both the catalog and the order ledger.
pub trait StoreDatabase: CatalogManagement + OrderLedger {}

impl<T> StoreDatabase for T where T: CatalogManagement + OrderLedger {}
