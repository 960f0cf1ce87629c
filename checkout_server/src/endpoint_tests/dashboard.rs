use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use checkout_engine::{
    db_types::{Money, NewOrder, Order, OrderDetail, OrderLine, OrderStatusType},
    events::EventProducers,
    order_objects::OrderQueryFilter,
    CatalogApi,
    OrderFlowApi,
    RevenueApi,
};
use serde_json::Value;

use super::{
    helpers::{catalog_product, saved_order, send_request, store, OWNER},
    mocks::MockStoreBackend,
};
use crate::{
    auth::USER_ID_HEADER,
    routes::{OrdersRoute, RevenueRoute},
};

/// One paid order (P1 at 10.00, P2 at 5.50) and one order still awaiting payment (P1 at 10.00).
fn order_details(query: &OrderQueryFilter) -> Vec<OrderDetail> {
    assert_eq!(query.store_id.as_ref().map(|s| s.as_str()), Some("S1"));
    let p1 = catalog_product("P1", &[("V1", Some("10.00"))]);
    let p2 = catalog_product("P2", &[("V2", Some("5.50"))]);
    let paid = NewOrder::new("S1".into())
        .with_item("P1".into(), Some("V1".into()), Money::from(1000))
        .with_item("P2".into(), Some("V2".into()), Money::from(550));
    let unpaid = NewOrder::new("S1".into()).with_item("P1".into(), Some("V1".into()), Money::from(1000));
    let mut paid = saved_order(paid);
    paid.status = OrderStatusType::Paid;
    paid.phone = "+1 555 0100".into();
    paid.address = "1 Main St, Springfield".into();
    let mut unpaid = saved_order(unpaid);
    unpaid.status = OrderStatusType::AwaitingPayment;
    let detail = |order: Order| {
        let lines = order
            .items
            .iter()
            .map(|item| {
                let product = if item.product_id.as_str() == "P1" { &p1 } else { &p2 };
                OrderLine {
                    item: item.clone(),
                    product: Some(product.product.clone()),
                    variation: Some(product.variations[0].variation.clone()),
                }
            })
            .collect();
        OrderDetail { order, lines }
    };
    vec![detail(unpaid), detail(paid)]
        .into_iter()
        .filter(|d| query.status.as_ref().map(|s| s.contains(&d.order.status)).unwrap_or(true))
        .collect()
}

fn catalog_backend() -> MockStoreBackend {
    let mut backend = MockStoreBackend::new();
    backend.expect_fetch_store().returning(|store_id| Ok((store_id.as_str() == "S1").then(|| store("S1"))));
    backend
}

fn ledger_backend() -> MockStoreBackend {
    let mut backend = MockStoreBackend::new();
    backend.expect_fetch_order_details().returning(|query| Ok(order_details(&query)));
    backend
}

fn configure(cfg: &mut ServiceConfig) {
    let catalog_api = CatalogApi::new(catalog_backend());
    let orders_api = OrderFlowApi::new(ledger_backend(), EventProducers::default());
    let revenue_api = RevenueApi::new(ledger_backend());
    cfg.service(OrdersRoute::<MockStoreBackend>::new())
        .service(RevenueRoute::<MockStoreBackend>::new())
        .app_data(web::Data::new(catalog_api))
        .app_data(web::Data::new(orders_api))
        .app_data(web::Data::new(revenue_api));
}

fn get(path: &str, user: Option<&str>) -> TestRequest {
    let req = TestRequest::get().uri(path);
    match user {
        Some(user) => req.insert_header((USER_ID_HEADER, user)),
        None => req,
    }
}

#[actix_web::test]
async fn orders_require_a_user() {
    let _ = env_logger::try_init().ok();
    let res = send_request(get("/api/S1/orders", None), configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, r#"{"error":"Authentication required. The X-User-Id header is missing"}"#);
    assert_eq!(res.headers.get("Access-Control-Allow-Origin").unwrap(), "*");
}

#[actix_web::test]
async fn orders_of_someone_elses_store() {
    let _ = env_logger::try_init().ok();
    let res = send_request(get("/api/S1/orders", Some("user_intruder")), configure).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let res = send_request(get("/api/S1/revenue", Some("user_intruder")), configure).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn orders_of_unknown_store() {
    let _ = env_logger::try_init().ok();
    let res = send_request(get("/api/S9/orders", Some(OWNER)), configure).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn order_listing() {
    let _ = env_logger::try_init().ok();
    let res = send_request(get("/api/S1/orders", Some(OWNER)), configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let orders: Value = serde_json::from_str(&res.body).unwrap();
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["isPaid"], false);
    assert_eq!(orders[0]["totalPrice"], 1000);
    assert_eq!(orders[1]["isPaid"], true);
    assert_eq!(orders[1]["products"], "Product P1, Product P2");
    assert_eq!(orders[1]["totalPrice"], 1550);
    assert_eq!(orders[1]["phone"], "+1 555 0100");
    assert_eq!(orders[1]["status"], "Paid");
}

#[actix_web::test]
async fn order_listing_by_status() {
    let _ = env_logger::try_init().ok();
    let res = send_request(get("/api/S1/orders?status=Paid", Some(OWNER)), configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let orders: Value = serde_json::from_str(&res.body).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn revenue_counts_only_paid_orders() {
    let _ = env_logger::try_init().ok();
    let res = send_request(get("/api/S1/revenue", Some(OWNER)), configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let report: Value = serde_json::from_str(&res.body).unwrap();
    assert_eq!(report["storeId"], "S1");
    assert_eq!(report["total"], 1550);
    assert_eq!(report["paidOrders"], 1);
    assert_eq!(report["lineItems"], 2);
    assert_eq!(report["flagged"].as_array().unwrap().len(), 0);
}
