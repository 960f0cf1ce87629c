//! The checkout transaction.
//!
//! A checkout turns a storefront cart into a persisted order and a hosted payment session:
//! 1. The cart is validated against the catalog ([`CartValidator`]). Any failure aborts before anything is written.
//! 2. Every validated line is priced ([`resolve_price`]) and becomes one order item and one payment line item, in cart
//!    order.
//! 3. The order and all of its items are committed in a single transaction, in the `Pending` state.
//! 4. A payment session is requested from the payment processor, tagged with the order id.
//! 5. The session is recorded against the order, which moves to `AwaitingPayment`.
//!
//! If step 4 fails, the order stays behind as `Pending`. It is not deleted and the request is not retried; the
//! abandoned order sweep eventually marks it `Abandoned`.
use log::*;

use crate::{
    checkout_objects::{CartItem, CheckoutOptions, CheckoutResult, ValidatedLine},
    db_types::{NewOrder, OrderId, StoreId},
    events::{EventProducers, OrderCreatedEvent},
    pricing::{resolve_price, ResolvedPrice},
    shop_api::{
        cart_validator::CartValidator,
        errors::{CheckoutError, ValidationError},
    },
    traits::{PaymentLineItem, PaymentProcessor, PaymentSessionRequest, StoreDatabase},
};

/// Every cart line is a single unit.
const LINE_QUANTITY: u32 = 1;

pub struct CheckoutApi<B, P> {
    db: B,
    processor: P,
    options: CheckoutOptions,
    producers: EventProducers,
}

impl<B, P> CheckoutApi<B, P> {
    pub fn new(db: B, processor: P, options: CheckoutOptions, producers: EventProducers) -> Self {
        Self { db, processor, options, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn options(&self) -> &CheckoutOptions {
        &self.options
    }
}

struct PricedLine {
    line: ValidatedLine,
    price: ResolvedPrice,
}

impl<B, P> CheckoutApi<B, P>
where
    B: StoreDatabase,
    P: PaymentProcessor,
{
    pub async fn checkout(&self, store_id: &StoreId, items: &[CartItem]) -> Result<CheckoutResult, CheckoutError> {
        if items.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        let lines = CartValidator::new(&self.db).validate(store_id, items).await?;
        let priced = lines.into_iter().map(price_line).collect::<Vec<PricedLine>>();

        let new_order = priced.iter().fold(NewOrder::new(store_id.clone()), |order, p| {
            let variation_id = Some(p.line.variation.variation.id.clone());
            order.with_item(p.line.product.id.clone(), variation_id, p.price.amount)
        });
        let order = self.db.insert_order(new_order).await.map_err(|e| {
            error!("🛒️ Could not save a new order for store {store_id}. {e}");
            e
        })?;
        info!("🛒️ Order {} created for store {store_id} with {} items", order.id, order.items.len());
        self.producers.publish_order_created(OrderCreatedEvent::new(order.clone())).await;

        let request = self.session_request(&order.id, &priced);
        debug!("🛒️ Requesting a payment session for order {} totalling {}", order.id, request.total());
        let session = self.processor.create_checkout_session(request).await.map_err(|e| {
            error!("🛒️ Payment session for order {} could not be created. The order remains Pending. {e}", order.id);
            CheckoutError::PaymentSession { order_id: order.id.clone(), source: e }
        })?;
        // Best effort. An order can be paid straight from Pending
        match self.db.attach_payment_session(&order.id, &session.id).await {
            Ok(o) => debug!("🛒️ Order {} is now {}", o.id, o.status),
            Err(e) => warn!("🛒️ Payment session {} could not be recorded against order {}. {e}", session.id, order.id),
        }
        Ok(CheckoutResult { order_id: order.id, url: session.url })
    }

    fn session_request(&self, order_id: &OrderId, lines: &[PricedLine]) -> PaymentSessionRequest {
        let line_items = lines
            .iter()
            .map(|p| PaymentLineItem {
                name: p.line.display_name(),
                unit_amount: p.price.amount,
                quantity: LINE_QUANTITY,
            })
            .collect();
        PaymentSessionRequest {
            order_id: order_id.clone(),
            currency: self.options.currency.clone(),
            line_items,
            success_url: self.options.success_url.clone(),
            cancel_url: self.options.cancel_url.clone(),
        }
    }
}

fn price_line(line: ValidatedLine) -> PricedLine {
    let price = resolve_price(&line.product, Some(&line.variation.variation));
    if price.is_missing() {
        warn!(
            "🛒️ No price found for product {} (variation {}). The line will be charged at zero.",
            line.product.id, line.variation.variation.id
        );
    }
    PricedLine { line, price }
}
