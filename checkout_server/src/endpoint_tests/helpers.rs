use actix_web::{
    http::{header::HeaderMap, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use checkout_engine::db_types::{
    CatalogProduct,
    NewOrder,
    Order,
    OrderItem,
    OrderStatusType,
    Product,
    Store,
    Variation,
    VariationDetail,
};
use chrono::{TimeZone, Utc};
use log::debug;

use crate::server::cors_headers;

pub const OWNER: &str = "user_owner";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Sends the request to an app with the `/api` scope set up the way the server sets it up.
pub async fn send_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> TestResponse {
    let app = App::new().service(web::scope("/api").wrap(cors_headers()).configure(configure));
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let headers = res.headers().clone();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    TestResponse { status, headers, body }
}

pub fn store(id: &str) -> Store {
    let t = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    Store { id: id.into(), name: format!("Store {id}"), user_id: OWNER.into(), created_at: t, updated_at: t }
}

/// A product in store `S1` with one variation per entry in `variations`, given as `(id, price)`.
pub fn catalog_product(id: &str, variations: &[(&str, Option<&str>)]) -> CatalogProduct {
    let t = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let product = Product {
        id: id.into(),
        store_id: "S1".into(),
        category_id: "shirts".into(),
        name: format!("Product {id}"),
        description: String::default(),
        price: None,
        is_featured: false,
        is_archived: false,
        created_at: t,
        updated_at: t,
    };
    let variations = variations
        .iter()
        .map(|&(v, price)| VariationDetail {
            variation: Variation {
                id: v.into(),
                product_id: id.into(),
                size_id: None,
                color_id: None,
                price: price.map(|p| p.parse().unwrap()),
                stock: 10,
                created_at: t,
            },
            size: None,
            color: None,
        })
        .collect();
    CatalogProduct { product, variations }
}

/// What the ledger hands back for a freshly inserted order.
pub fn saved_order(order: NewOrder) -> Order {
    let items = order
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| OrderItem {
            id: i as i64 + 1,
            order_id: order.id.clone(),
            position: i as i64,
            product_id: item.product_id,
            variation_id: item.variation_id,
            unit_price: Some(item.unit_price),
        })
        .collect();
    Order {
        id: order.id,
        store_id: order.store_id,
        status: OrderStatusType::Pending,
        phone: String::default(),
        address: String::default(),
        payment_session_id: None,
        created_at: order.created_at,
        updated_at: order.created_at,
        items,
    }
}
