use checkout_engine::{
    checkout_objects::{CartItem, CheckoutOptions, CheckoutResult},
    db_types::OrderId,
    events::EventProducers,
    CheckoutApi,
    CheckoutError,
    SqliteDatabase,
};
use cucumber::World;

use crate::support::{prepare_env::prepare_test_env, processor::FakeProcessor};

#[derive(Default, Debug, World)]
pub struct CheckoutWorld {
    pub system: Option<CheckoutSystem>,
}

#[derive(Debug)]
pub struct CheckoutSystem {
    pub db: SqliteDatabase,
    pub processor: FakeProcessor,
    pub last_checkout: Option<Result<CheckoutResult, CheckoutError>>,
    pub last_order: Option<OrderId>,
}

impl CheckoutSystem {
    pub async fn new() -> Self {
        let db = prepare_test_env().await;
        Self { db, processor: FakeProcessor::default(), last_checkout: None, last_order: None }
    }

    pub fn api(&self) -> CheckoutApi<SqliteDatabase, FakeProcessor> {
        let options = CheckoutOptions::for_storefront("https://shop.example.com", "usd");
        CheckoutApi::new(self.db.clone(), self.processor.clone(), options, EventProducers::default())
    }
}

impl CheckoutWorld {
    /// Creates the database on first use.
    pub async fn system(&mut self) -> &mut CheckoutSystem {
        if self.system.is_none() {
            self.system = Some(CheckoutSystem::new().await);
        }
        self.system.as_mut().expect("System was just initialised")
    }

    pub fn db(&self) -> &SqliteDatabase {
        &self.system.as_ref().expect("System not initialised").db
    }
}

/// Parses a cart written as `P1,P2:V2`, i.e. comma-separated product ids with an optional `:variation` suffix.
pub fn parse_cart(cart: &str) -> Vec<CartItem> {
    cart.split(',')
        .map(str::trim)
        .map(|line| match line.split_once(':') {
            Some((product, variation)) => CartItem::new(product).with_variation(variation),
            None => CartItem::new(line),
        })
        .collect()
}
