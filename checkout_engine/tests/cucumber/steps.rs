use checkout_engine::{
    db_types::{Money, PaymentDetails},
    order_objects::OrderQueryFilter,
    traits::OrderLedger,
    RevenueApi,
};
use cucumber::{given, then, when};

use crate::{
    cucumber::{world::parse_cart, CheckoutWorld},
    support::seed,
};

#[given(expr = "a store '{word}'")]
async fn a_store(world: &mut CheckoutWorld, store_id: String) {
    let sys = world.system().await;
    seed::store(&sys.db, &store_id).await;
}

#[given(expr = "product '{word}' in store '{word}' with variation '{word}' priced at {word}")]
async fn product_with_variation(
    world: &mut CheckoutWorld,
    product_id: String,
    store_id: String,
    variation_id: String,
    price: String,
) {
    let sys = world.system().await;
    seed::product(&sys.db, &store_id, &product_id, None, 0).await;
    seed::variation(&sys.db, &product_id, &variation_id, Some(&price)).await;
}

#[given(expr = "product '{word}' in store '{word}' with no variations")]
async fn product_without_variations(world: &mut CheckoutWorld, product_id: String, store_id: String) {
    let sys = world.system().await;
    seed::product(&sys.db, &store_id, &product_id, Some("1.00"), 0).await;
}

#[when(expr = "a customer checks out store '{word}' with cart '{word}'")]
async fn checkout(world: &mut CheckoutWorld, store_id: String, cart: String) {
    let sys = world.system().await;
    let result = sys.api().checkout(&store_id.into(), &parse_cart(&cart)).await;
    if let Ok(res) = &result {
        sys.last_order = Some(res.order_id.clone());
    }
    sys.last_checkout = Some(result);
}

#[when("the order is paid")]
async fn order_is_paid(world: &mut CheckoutWorld) {
    let sys = world.system().await;
    let order_id = sys.last_order.clone().expect("No order has been placed");
    sys.db.mark_order_paid(&order_id, PaymentDetails::default()).await.expect("Error marking order paid");
}

#[then("the checkout succeeds with a payment URL")]
async fn checkout_succeeds(world: &mut CheckoutWorld) {
    let sys = world.system().await;
    match &sys.last_checkout {
        Some(Ok(res)) => assert!(res.url.starts_with("https://pay.example.com/"), "Unexpected URL: {}", res.url),
        other => panic!("Expected a successful checkout, got {other:?}"),
    }
}

#[then(expr = "the checkout fails with {string}")]
async fn checkout_fails(world: &mut CheckoutWorld, message: String) {
    let sys = world.system().await;
    match &sys.last_checkout {
        Some(Err(e)) => {
            assert!(e.is_validation_error(), "Expected a validation error, got {e:?}");
            assert_eq!(e.to_string(), message);
        },
        other => panic!("Expected the checkout to fail, got {other:?}"),
    }
}

#[then(expr = "the order has {int} item(s) referencing variation(s) '{word}'")]
async fn order_items(world: &mut CheckoutWorld, count: usize, variations: String) {
    let sys = world.system().await;
    let order_id = sys.last_order.clone().expect("No order has been placed");
    let order = sys.db.fetch_order(&order_id).await.unwrap().expect("Order not found");
    assert_eq!(order.items.len(), count);
    let ids = order.items.iter().filter_map(|i| i.variation_id.as_ref().map(|v| v.to_string())).collect::<Vec<_>>();
    assert_eq!(ids.join(","), variations);
}

#[then(expr = "payment line {int} is charged {int} minor units")]
async fn payment_line(world: &mut CheckoutWorld, line: usize, amount: i64) {
    let sys = world.system().await;
    let request = sys.processor.requests().pop().expect("No payment session was requested");
    assert_eq!(request.line_items[line - 1].unit_amount, Money::from(amount));
}

#[then(expr = "store '{word}' has {int} order(s)")]
async fn order_count(world: &mut CheckoutWorld, store_id: String, count: usize) {
    let query = OrderQueryFilter::default().with_store_id(store_id.into());
    let orders = world.db().search_orders(query).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}

#[then(expr = "the revenue of store '{word}' is {word}")]
async fn revenue(world: &mut CheckoutWorld, store_id: String, total: String) {
    let report = RevenueApi::new(world.db().clone()).total_revenue(&store_id.into()).await.expect("Revenue failed");
    assert_eq!(report.total.to_string(), total);
}
