use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Money, OrderStatusType, StoreId},
    order_objects::OrderQueryFilter,
    pricing::{price_order_line, PriceDiagnostic},
    traits::{LedgerError, OrderLedger},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub store_id: StoreId,
    pub total: Money,
    pub paid_orders: usize,
    pub line_items: usize,
    /// Line items that were counted at zero because no price could be found for them.
    pub flagged: Vec<PriceDiagnostic>,
}

/// Read-only revenue reporting over the order ledger. Only paid orders count.
pub struct RevenueApi<B> {
    db: B,
}

impl<B> RevenueApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> RevenueApi<B>
where B: OrderLedger
{
    /// Sums the price of every item of every paid order of the store. Each item is priced at the unit price captured
    /// at checkout, or resolved from the catalog for items that predate price capture.
    ///
    /// Items that end up at zero are reported in [`RevenueReport::flagged`] rather than failing the report.
    pub async fn total_revenue(&self, store_id: &StoreId) -> Result<RevenueReport, LedgerError> {
        let query = OrderQueryFilter::default().with_store_id(store_id.clone()).with_status(OrderStatusType::Paid);
        let orders = self.db.fetch_order_details(query).await?;
        let mut report = RevenueReport {
            store_id: store_id.clone(),
            total: Money::zero(),
            paid_orders: orders.len(),
            line_items: 0,
            flagged: Vec::new(),
        };
        for detail in &orders {
            for line in &detail.lines {
                let (price, diagnostic) = price_order_line(&detail.order.id, line);
                report.total = report.total + price.amount;
                report.line_items += 1;
                if let Some(diagnostic) = diagnostic {
                    warn!("📊️ {diagnostic}");
                    report.flagged.push(diagnostic);
                }
            }
        }
        debug!(
            "📊️ Revenue for store {store_id}: {} over {} paid orders ({} items, {} flagged)",
            report.total,
            report.paid_orders,
            report.line_items,
            report.flagged.len()
        );
        Ok(report)
    }
}
