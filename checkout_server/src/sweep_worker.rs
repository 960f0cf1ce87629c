use chrono::Duration;
use checkout_engine::{db_types::Order, events::EventProducers, OrderFlowApi, SqliteDatabase};
use log::*;
use tokio::task::JoinHandle;

/// Starts the abandoned order sweep. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every `interval`, orders that are still unpaid and have not been updated for longer than `limit` are marked as
/// abandoned.
pub fn start_sweep_worker(
    db: SqliteDatabase,
    producers: EventProducers,
    limit: Duration,
    interval: std::time::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        let api = OrderFlowApi::new(db, producers);
        info!("🕰️ Abandoned order sweep started. Orders unpaid for {} hrs will be abandoned", limit.num_hours());
        loop {
            timer.tick().await;
            trace!("🕰️ Running abandoned order sweep");
            match api.abandon_stale_orders(limit).await {
                Ok(orders) if orders.is_empty() => trace!("🕰️ No stale orders found"),
                Ok(orders) => {
                    info!("🕰️ {} orders abandoned", orders.len());
                    debug!("🕰️ Abandoned orders: {}", order_list(&orders));
                },
                Err(e) => {
                    error!("🕰️ Error running abandoned order sweep: {e}");
                },
            }
        }
    })
}

fn order_list(orders: &[Order]) -> String {
    orders
        .iter()
        .map(|o| format!("[{}] store: {} last updated {}", o.id, o.store_id, o.updated_at))
        .collect::<Vec<String>>()
        .join(", ")
}
