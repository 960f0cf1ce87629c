//! Glue between the checkout engine and the outside world: the payment processor, and the lifecycle hooks the server
//! installs on the engine.
use checkout_engine::events::EventHooks;
use futures::FutureExt;
use log::*;

pub mod stripe;

/// Hooks that write every order lifecycle event to the log.
pub fn logging_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_order_created(|ev| {
            async move {
                let order = ev.order;
                info!("📬️ Order {} created for store {} with {} items", order.id, order.store_id, order.items.len());
            }
            .boxed()
        })
        .on_order_paid(|ev| {
            async move {
                info!("📬️ Order {} for store {} has been paid", ev.order.id, ev.order.store_id);
            }
            .boxed()
        })
        .on_order_abandoned(|ev| {
            async move {
                info!("📬️ Order {} for store {} was abandoned", ev.order.id, ev.order.store_id);
            }
            .boxed()
        });
    hooks
}
