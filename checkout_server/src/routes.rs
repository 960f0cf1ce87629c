//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O (database reads, calls to the payment processor) is
//! expressed as futures, so that async handlers are executed concurrently by the worker threads.
use actix_web::{get, options, web, HttpResponse, Responder};
use checkout_engine::{
    db_types::{ProductId, StoreId},
    traits::{CatalogManagement, PaymentProcessor, StoreDatabase},
    CatalogApi,
    CheckoutApi,
    OrderFlowApi,
    RevenueApi,
};
use log::*;
use serde_json::json;

use crate::{
    auth::UserId,
    data_objects::{CheckoutRequest, CheckoutResponse, OrderListParams, ProductListParams},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(checkout => Post "/{store_id}/checkout" impl StoreDatabase, PaymentProcessor);
/// Route handler for the storefront checkout.
///
/// The body is the buyer's cart, `{"items": [{"productId": "...", "variationId": "..."}]}`. Every line is a single
/// unit, and a line without a variation is charged as the product's first variation.
///
/// On success, the order has been saved and the response carries the payment page URL the buyer must be redirected
/// to. Carts that cannot be checked out are rejected with a 400 and a plain text reason that the storefront can show.
pub async fn checkout<B, P>(
    path: web::Path<String>,
    body: web::Json<CheckoutRequest>,
    api: web::Data<CheckoutApi<B, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: StoreDatabase,
    P: PaymentProcessor,
{
    let store_id = StoreId::from(path.into_inner());
    let request = body.into_inner();
    debug!("💻️ POST checkout for store {store_id} with {} lines", request.items.len());
    let result = api.checkout(&store_id, &request.items).await.map_err(|e| {
        if e.is_validation_error() {
            info!("💻️ Rejected checkout for store {store_id}. {e}");
        } else {
            error!("💻️ Checkout for store {store_id} failed. {e}");
        }
        ServerError::from(e)
    })?;
    debug!("💻️ Order {} is awaiting payment", result.order_id);
    Ok(HttpResponse::Ok().json(CheckoutResponse { url: result.url }))
}

/// CORS preflight for the checkout route. The CORS headers themselves are added to every `/api` response.
#[options("/{store_id}/checkout")]
pub async fn checkout_preflight() -> impl Responder {
    HttpResponse::Ok().json(json!({}))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(products => Get "/{store_id}/products" impl CatalogManagement);
/// The storefront product listing, newest first. Supports the `categoryId` and `isFeatured` query parameters.
pub async fn products<B: CatalogManagement>(
    path: web::Path<String>,
    query: web::Query<ProductListParams>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let store_id = StoreId::from(path.into_inner());
    let products = api.products_for_store(&store_id, query.into_inner().into()).await.map_err(|e| {
        debug!("💻️ Could not fetch products for store {store_id}. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/{store_id}/products/{product_id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    path: web::Path<(String, String)>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (store_id, product_id) = path.into_inner();
    let (store_id, product_id) = (StoreId::from(store_id), ProductId::from(product_id));
    trace!("💻️ GET product {product_id} for store {store_id}");
    let product = api
        .product(&store_id, &product_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Product {product_id} does not exist")))?;
    Ok(HttpResponse::Ok().json(product))
}

//----------------------------------------------   Dashboard  ----------------------------------------------------
route!(orders => Get "/{store_id}/orders" impl StoreDatabase);
/// The store owner's order listing, newest first. Supports the `since`, `until` and `status` query parameters.
pub async fn orders<B: StoreDatabase>(
    user: UserId,
    path: web::Path<String>,
    query: web::Query<OrderListParams>,
    catalog: web::Data<CatalogApi<B>>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let store_id = StoreId::from(path.into_inner());
    debug!("💻️ GET orders for store {store_id} by {user}");
    catalog.check_store_owner(&store_id, user.as_str()).await?;
    let orders = api.orders_for_store(&store_id, query.into_inner().into()).await.map_err(|e| {
        debug!("💻️ Could not fetch orders for store {store_id}. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(revenue => Get "/{store_id}/revenue" impl StoreDatabase);
/// Total revenue of the store: the sum of every item of every paid order, in minor currency units.
pub async fn revenue<B: StoreDatabase>(
    user: UserId,
    path: web::Path<String>,
    catalog: web::Data<CatalogApi<B>>,
    api: web::Data<RevenueApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let store_id = StoreId::from(path.into_inner());
    debug!("💻️ GET revenue for store {store_id} by {user}");
    catalog.check_store_owner(&store_id, user.as_str()).await?;
    let report = api.total_revenue(&store_id).await.map_err(|e| {
        debug!("💻️ Could not calculate revenue for store {store_id}. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(report))
}

/// Registers every `/api` route against the given backend and payment processor.
pub fn configure<B, P>(cfg: &mut web::ServiceConfig)
where
    B: StoreDatabase + 'static,
    P: PaymentProcessor + 'static,
{
    cfg.service(CheckoutRoute::<B, P>::new())
        .service(checkout_preflight)
        .service(ProductsRoute::<B>::new())
        .service(ProductByIdRoute::<B>::new())
        .service(OrdersRoute::<B>::new())
        .service(RevenueRoute::<B>::new());
}
