use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use checkout_engine::{
    checkout_objects::CheckoutOptions,
    db_types::{CatalogProduct, Money, NewOrder, OrderStatusType},
    events::EventProducers,
    traits::{PaymentProcessorError, PaymentSession},
    CheckoutApi,
};
use serde_json::json;

use super::{
    helpers::{catalog_product, saved_order, send_request},
    mocks::{MockProcessor, MockStoreBackend},
};
use crate::routes::{checkout_preflight, CheckoutRoute};

fn catalog() -> Vec<CatalogProduct> {
    vec![catalog_product("P1", &[("V1", Some("10.00"))]), catalog_product("P2", &[("V2", Some("5.50"))])]
}

fn backend() -> MockStoreBackend {
    let mut backend = MockStoreBackend::new();
    backend
        .expect_fetch_products_by_id()
        .returning(|_, ids| Ok(catalog().into_iter().filter(|p| ids.contains(&p.product.id)).collect()));
    backend.expect_insert_order().times(1).returning(|order| Ok(saved_order(order)));
    backend.expect_attach_payment_session().returning(|order_id, session_id| {
        let mut order = saved_order(NewOrder::new("S1".into()));
        order.id = order_id.clone();
        order.status = OrderStatusType::AwaitingPayment;
        order.payment_session_id = Some(session_id.to_string());
        Ok(order)
    });
    backend
}

fn register(cfg: &mut ServiceConfig, backend: MockStoreBackend, processor: MockProcessor) {
    let options = CheckoutOptions::for_storefront("https://shop.example.com", "usd");
    let api = CheckoutApi::new(backend, processor, options, EventProducers::default());
    cfg.service(CheckoutRoute::<MockStoreBackend, MockProcessor>::new())
        .service(checkout_preflight)
        .app_data(web::Data::new(api));
}

fn configure(cfg: &mut ServiceConfig) {
    let mut processor = MockProcessor::new();
    processor
        .expect_create_checkout_session()
        .withf(|req| {
            req.currency == "usd" &&
                req.success_url == "https://shop.example.com/cart?success=1" &&
                req.line_items.iter().map(|li| li.unit_amount).collect::<Vec<Money>>() ==
                    vec![Money::from(1000), Money::from(550)]
        })
        .times(1)
        .returning(|req| {
            Ok(PaymentSession {
                id: format!("cs_test_{}", req.order_id),
                url: format!("https://pay.example.com/c/{}", req.order_id),
            })
        });
    register(cfg, backend(), processor);
}

// Nothing may be written, and the payment processor may not be called, for a cart that fails validation
fn configure_validation_only(cfg: &mut ServiceConfig) {
    let mut backend = MockStoreBackend::new();
    backend
        .expect_fetch_products_by_id()
        .returning(|_, ids| Ok(catalog().into_iter().filter(|p| ids.contains(&p.product.id)).collect()));
    backend.expect_insert_order().never();
    let mut processor = MockProcessor::new();
    processor.expect_create_checkout_session().never();
    register(cfg, backend, processor);
}

fn configure_processor_down(cfg: &mut ServiceConfig) {
    let mut processor = MockProcessor::new();
    processor
        .expect_create_checkout_session()
        .times(1)
        .returning(|_| Err(PaymentProcessorError::Unavailable("connection refused".into())));
    register(cfg, backend(), processor);
}

#[actix_web::test]
async fn checkout_returns_payment_url() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/S1/checkout")
        .set_json(json!({"items": [{"productId": "P1"}, {"productId": "P2", "variationId": "V2"}]}));
    let res = send_request(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.starts_with(r#"{"url":"https://pay.example.com/c/"#), "Unexpected body: {}", res.body);
    assert_eq!(res.headers.get("Access-Control-Allow-Origin").unwrap(), "*");
}

#[actix_web::test]
async fn empty_cart_is_rejected() {
    let _ = env_logger::try_init().ok();
    for body in [json!({}), json!({"items": []})] {
        let req = TestRequest::post().uri("/api/S1/checkout").set_json(body);
        let res = send_request(req, configure_validation_only).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body, "Items are required");
        assert!(res.headers.get("content-type").unwrap().to_str().unwrap().starts_with("text/plain"));
    }
}

#[actix_web::test]
async fn unknown_product_is_rejected() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/S1/checkout")
        .set_json(json!({"items": [{"productId": "P1"}, {"productId": "P9"}]}));
    let res = send_request(req, configure_validation_only).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Invalid product or variation: P9");
}

#[actix_web::test]
async fn variation_of_another_product_is_rejected() {
    let _ = env_logger::try_init().ok();
    let req =
        TestRequest::post().uri("/api/S1/checkout").set_json(json!({"items": [{"productId": "P1", "variationId": "V2"}]}));
    let res = send_request(req, configure_validation_only).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.starts_with("Invalid product or variation"), "Unexpected body: {}", res.body);
}

#[actix_web::test]
async fn oversized_cart_is_rejected() {
    let _ = env_logger::try_init().ok();
    let items = vec![json!({"productId": "P1"}); 101];
    let req = TestRequest::post().uri("/api/S1/checkout").set_json(json!({ "items": items }));
    let res = send_request(req, configure_validation_only).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "A cart may hold at most 100 items, not 101");
}

#[actix_web::test]
async fn missing_product_id_is_rejected() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/api/S1/checkout").set_json(json!({"items": [{"variationId": "V1"}]}));
    let res = send_request(req, configure_validation_only).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Missing required field: productId");
}

#[actix_web::test]
async fn payment_processor_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/api/S1/checkout").set_json(json!({"items": [{"productId": "P1"}]}));
    let res = send_request(req, configure_processor_down).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
    assert_eq!(res.headers.get("Access-Control-Allow-Origin").unwrap(), "*");
}

#[actix_web::test]
async fn preflight() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::default().method(actix_web::http::Method::OPTIONS).uri("/api/S1/checkout");
    let res = send_request(req, configure_validation_only).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "{}");
    assert_eq!(res.headers.get("Access-Control-Allow-Origin").unwrap(), "*");
    assert_eq!(res.headers.get("Access-Control-Allow-Methods").unwrap(), "GET, POST, PUT, DELETE, OPTIONS");
    assert_eq!(res.headers.get("Access-Control-Allow-Headers").unwrap(), "Content-Type, Authorization");
}
