use std::time::Duration;

use actix_web::{
    dev::Server,
    http::KeepAlive,
    middleware::{DefaultHeaders, Logger},
    web,
    App,
    HttpServer,
};
use checkout_engine::{
    checkout_objects::CheckoutOptions,
    events::{EventHandlers, EventProducers},
    CatalogApi,
    CheckoutApi,
    OrderFlowApi,
    RevenueApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::{is_loopback_host, USER_ID_HEADER},
    config::ServerConfig,
    errors::ServerError,
    integrations::{logging_event_hooks, stripe::StripePaymentProcessor},
    routes::{configure, health},
    sweep_worker::start_sweep_worker,
};

const EVENT_BUFFER_SIZE: usize = 128;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    if !is_loopback_host(&config.host) {
        warn!(
            "💻️ Listening on {}. User ids are taken from the {USER_ID_HEADER} header without verification, so only \
             the authenticating proxy may be able to reach this address.",
            config.host
        );
    }
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Migrations failed. {e}")))?;
    }
    let processor = StripePaymentProcessor::new(config.stripe.clone())
        .map_err(|e| ServerError::ConfigurationError(format!("Payment processor could not be set up. {e}")))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, logging_event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers();
    // Runs until the process exits
    let _sweeper =
        start_sweep_worker(db.clone(), producers.clone(), config.abandoned_order_timeout, config.sweep_interval);
    let srv = create_server_instance(config, db, processor, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    processor: StripePaymentProcessor,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let options = CheckoutOptions::for_storefront(&config.storefront_url, &config.currency);
    info!("💻️ Buyers will return to {} after paying", options.success_url);
    let srv = HttpServer::new(move || {
        let checkout_api = CheckoutApi::new(db.clone(), processor.clone(), options.clone(), producers.clone());
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let revenue_api = RevenueApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("shop::access_log"))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(revenue_api))
            .service(health)
            .service(
                web::scope("/api").wrap(cors_headers()).configure(configure::<SqliteDatabase, StripePaymentProcessor>),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// The storefront runs on a different origin from the API, so every `/api` response allows any origin.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
}
