use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Published once the order and all of its items have been committed, before a payment session is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order: Order,
}

impl OrderCreatedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPaidEvent {
    pub order: Order,
}

impl OrderPaidEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAbandonedEvent {
    pub order: Order,
}

impl OrderAbandonedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
