use std::fmt::Display;

use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Money, OrderDetail, OrderId, OrderStatusType, StoreId},
    pricing::price_order_line,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub store_id: Option<StoreId>,
    pub order_id: Option<OrderId>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub status: Option<Vec<OrderStatusType>>,
}

impl OrderQueryFilter {
    pub fn with_store_id(mut self, store_id: StoreId) -> Self {
        self.store_id = Some(store_id);
        self
    }

    pub fn with_order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.store_id.is_none() &&
            self.order_id.is_none() &&
            self.since.is_none() &&
            self.until.is_none() &&
            self.status.as_ref().map(|s| s.is_empty()).unwrap_or(true)
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(store_id) = &self.store_id {
            write!(f, "store_id: {store_id}. ")?;
        }
        if let Some(order_id) = &self.order_id {
            write!(f, "order_id: {order_id}. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until {until}. ")?;
        }
        if let Some(statuses) = self.status.as_ref().filter(|s| !s.is_empty()) {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(",");
            write!(f, "statuses: {statuses}. ")?;
        }
        Ok(())
    }
}

/// One row of the dashboard order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub phone: String,
    pub address: String,
    /// Product names of all items, in cart order, joined with ", ".
    pub products: String,
    pub total_price: Money,
    pub is_paid: bool,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderDetail> for OrderSummary {
    fn from(detail: &OrderDetail) -> Self {
        let order = &detail.order;
        let products = detail
            .lines
            .iter()
            .map(|line| line.product.as_ref().map(|p| p.name.as_str()).unwrap_or("Unknown product"))
            .collect::<Vec<&str>>()
            .join(", ");
        let total_price = detail
            .lines
            .iter()
            .map(|line| {
                let (price, diagnostic) = price_order_line(&order.id, line);
                if let Some(diagnostic) = diagnostic {
                    warn!("📝️ {diagnostic}");
                }
                price.amount
            })
            .sum();
        Self {
            id: order.id.clone(),
            phone: order.phone.clone(),
            address: order.address.clone(),
            products,
            total_price,
            is_paid: order.is_paid(),
            status: order.status,
            created_at: order.created_at,
        }
    }
}
