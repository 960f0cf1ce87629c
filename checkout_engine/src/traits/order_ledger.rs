use chrono::Duration;
use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderDetail, OrderId, OrderStatusType, PaymentDetails},
    order_objects::OrderQueryFilter,
};

/// The persistence boundary for orders and their items.
///
/// The ledger trusts the store id it is given. Callers are responsible for checking that the acting user owns the
/// store before calling any mutating method.
#[allow(async_fn_in_trait)]
pub trait OrderLedger {
    /// Writes the order and all its items in a single atomic transaction. Orders without items are rejected.
    /// New orders always start out as [`OrderStatusType::Pending`].
    async fn insert_order(&self, order: NewOrder) -> Result<Order, LedgerError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, LedgerError>;

    /// Fetches the orders (including their items) that match the filter, newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, LedgerError>;

    /// As [`search_orders`](OrderLedger::search_orders), but every item also carries the product and variation it
    /// refers to, if they still exist.
    async fn fetch_order_details(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetail>, LedgerError>;

    /// Records the payment session created for the order and moves it from `Pending` to `AwaitingPayment`.
    async fn attach_payment_session(&self, order_id: &OrderId, session_id: &str) -> Result<Order, LedgerError>;

    /// Marks the order as paid and stores the customer details collected by the payment processor. An order can only
    /// be marked as paid once.
    async fn mark_order_paid(&self, order_id: &OrderId, details: PaymentDetails) -> Result<Order, LedgerError>;

    /// Marks every `Pending` or `AwaitingPayment` order that has not been updated for longer than `limit` as
    /// `Abandoned`, returning the affected orders.
    async fn abandon_stale_orders(&self, limit: Duration) -> Result<Vec<Order>, LedgerError>;
}

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Ledger database error: {0}")]
    DatabaseError(String),
    #[error("An order must contain at least one item")]
    EmptyOrder,
    #[error("Order {0} already exists")]
    OrderAlreadyExists(OrderId),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidStatusTransition { order_id: OrderId, from: OrderStatusType, to: OrderStatusType },
    #[error("An abandoned order timeout of {0} reaches past the earliest representable time")]
    TimeoutOutOfRange(Duration),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}
