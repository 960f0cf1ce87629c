use std::fmt::Debug;

use chrono::Duration;
use log::*;

use crate::{
    db_types::{Order, OrderId, PaymentDetails, StoreId},
    events::{EventProducers, OrderAbandonedEvent, OrderPaidEvent},
    order_objects::{OrderQueryFilter, OrderSummary},
    traits::{LedgerError, OrderLedger},
};

/// `OrderFlowApi` drives orders through their lifecycle after checkout, and provides the dashboard's view of them.
///
/// State changes publish the matching lifecycle event once the ledger has committed them.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B: Debug> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.db)
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: OrderLedger
{
    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, LedgerError> {
        self.db.fetch_order(order_id).await
    }

    /// Records a confirmed payment for the order. This is what the payment processor's confirmation callback calls,
    /// using the order id it carried in the session metadata.
    ///
    /// Paying an order twice fails with [`LedgerError::InvalidStatusTransition`], so an order is only ever counted
    /// once in revenue.
    pub async fn confirm_payment(&self, order_id: &OrderId, details: PaymentDetails) -> Result<Order, LedgerError> {
        let order = self.db.mark_order_paid(order_id, details).await?;
        info!("📝️ Order {order_id} has been paid");
        self.producers.publish_order_paid(OrderPaidEvent::new(order.clone())).await;
        Ok(order)
    }

    /// Marks orders that have been waiting for payment for longer than `limit` as abandoned.
    pub async fn abandon_stale_orders(&self, limit: Duration) -> Result<Vec<Order>, LedgerError> {
        let orders = self.db.abandon_stale_orders(limit).await?;
        if !orders.is_empty() {
            info!("📝️ {} unpaid orders older than {} minutes marked as abandoned", orders.len(), limit.num_minutes());
        }
        for order in &orders {
            self.producers.publish_order_abandoned(OrderAbandonedEvent::new(order.clone())).await;
        }
        Ok(orders)
    }

    /// The dashboard order listing for a store, newest first. Any store filter in `query` is replaced by `store_id`.
    pub async fn orders_for_store(
        &self,
        store_id: &StoreId,
        query: OrderQueryFilter,
    ) -> Result<Vec<OrderSummary>, LedgerError> {
        let query = query.with_store_id(store_id.clone());
        trace!("📝️ Fetching orders: {query}");
        let details = self.db.fetch_order_details(query).await?;
        Ok(details.iter().map(OrderSummary::from).collect())
    }
}
