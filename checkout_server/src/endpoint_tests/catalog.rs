use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use checkout_engine::CatalogApi;

use super::{
    helpers::{catalog_product, send_request},
    mocks::MockStoreBackend,
};
use crate::routes::{ProductByIdRoute, ProductsRoute};

fn configure(cfg: &mut ServiceConfig) {
    let mut backend = MockStoreBackend::new();
    backend.expect_fetch_products_for_store().returning(|store_id, query| {
        assert_eq!(store_id.as_str(), "S1");
        // Archived products are never listed on the storefront
        assert!(!query.include_archived);
        let products = vec![catalog_product("P2", &[("V2", Some("5.50"))]), catalog_product("P1", &[("V1", None)])];
        Ok(products.into_iter().filter(|p| query.category_id.is_none() || p.product.id.as_str() == "P2").collect())
    });
    backend.expect_fetch_product().returning(|_, product_id| {
        Ok((product_id.as_str() == "P1").then(|| catalog_product("P1", &[("V1", Some("10.00"))])))
    });
    let api = CatalogApi::new(backend);
    cfg.service(ProductsRoute::<MockStoreBackend>::new())
        .service(ProductByIdRoute::<MockStoreBackend>::new())
        .app_data(web::Data::new(api));
}

#[actix_web::test]
async fn list_products() {
    let _ = env_logger::try_init().ok();
    let res = send_request(TestRequest::get().uri("/api/S1/products"), configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let products: serde_json::Value = serde_json::from_str(&res.body).unwrap();
    let products = products.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["id"], "P2");
    assert_eq!(products[0]["storeId"], "S1");
    assert_eq!(products[0]["variations"][0]["price"], "5.50");
    assert_eq!(res.headers.get("Access-Control-Allow-Origin").unwrap(), "*");
}

#[actix_web::test]
async fn list_products_by_category() {
    let _ = env_logger::try_init().ok();
    let res = send_request(TestRequest::get().uri("/api/S1/products?categoryId=hats&isFeatured=true"), configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let products: serde_json::Value = serde_json::from_str(&res.body).unwrap();
    assert_eq!(products.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn fetch_single_product() {
    let _ = env_logger::try_init().ok();
    let res = send_request(TestRequest::get().uri("/api/S1/products/P1"), configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let product: serde_json::Value = serde_json::from_str(&res.body).unwrap();
    assert_eq!(product["name"], "Product P1");
    assert_eq!(product["variations"][0]["id"], "V1");
}

#[actix_web::test]
async fn missing_product_is_not_found() {
    let _ = env_logger::try_init().ok();
    let res = send_request(TestRequest::get().uri("/api/S1/products/P9"), configure).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, r#"{"error":"The data was not found. Product P9 does not exist"}"#);
}
