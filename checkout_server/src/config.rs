use std::env;

use chrono::Duration;
use log::*;
use shop_common::{parse_boolean_flag, DEFAULT_CURRENCY_CODE};
use stripe_tools::StripeConfig;

const DEFAULT_SHOP_HOST: &str = "127.0.0.1";
const DEFAULT_SHOP_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/storefront.db";
const DEFAULT_STOREFRONT_URL: &str = "http://localhost:3001";
const DEFAULT_ABANDONED_ORDER_TIMEOUT: Duration = Duration::hours(24);
/// Ten years.
const MAX_ABANDONED_ORDER_TIMEOUT_HOURS: i64 = 87_600;
const DEFAULT_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, pending schema migrations are applied on startup.
    pub run_migrations: bool,
    /// ISO currency code used for every payment session.
    pub currency: String,
    /// The storefront's base URL. Buyers are sent back to its cart page after paying or cancelling.
    pub storefront_url: String,
    /// The time an unpaid order may go without updates before it is marked as abandoned.
    pub abandoned_order_timeout: Duration,
    /// How often the abandoned order sweep runs.
    pub sweep_interval: std::time::Duration,
    pub stripe: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SHOP_HOST.to_string(),
            port: DEFAULT_SHOP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            run_migrations: false,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            storefront_url: DEFAULT_STOREFRONT_URL.to_string(),
            abandoned_order_timeout: DEFAULT_ABANDONED_ORDER_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            stripe: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SHOP_HOST").ok().unwrap_or_else(|| DEFAULT_SHOP_HOST.into());
        let port = env::var("SHOP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SHOP_PORT. {e} Using the default, {DEFAULT_SHOP_PORT}, \
                         instead."
                    );
                    DEFAULT_SHOP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SHOP_PORT);
        let database_url = env::var("SHOP_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SHOP_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let run_migrations = parse_boolean_flag(env::var("SHOP_RUN_MIGRATIONS").ok(), false);
        let currency = env::var("SHOP_CURRENCY")
            .ok()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
        let storefront_url = env::var("SHOP_FRONTEND_STORE_URL").ok().unwrap_or_else(|| {
            error!(
                "🪛️ SHOP_FRONTEND_STORE_URL is not set. Buyers will be redirected to {DEFAULT_STOREFRONT_URL} after \
                 paying, which is almost certainly not what you want."
            );
            DEFAULT_STOREFRONT_URL.to_string()
        });
        let abandoned_order_timeout = configure_abandoned_order_timeout();
        let sweep_interval = configure_sweep_interval();
        let stripe = StripeConfig::new_from_env_or_default();
        Self {
            host,
            port,
            database_url,
            run_migrations,
            currency,
            storefront_url,
            abandoned_order_timeout,
            sweep_interval,
            stripe,
        }
    }
}

fn configure_abandoned_order_timeout() -> Duration {
    env::var("SHOP_ABANDONED_ORDER_TIMEOUT")
        .map_err(|_| {
            info!(
                "🪛️ SHOP_ABANDONED_ORDER_TIMEOUT is not set. Using the default value of {} hrs.",
                DEFAULT_ABANDONED_ORDER_TIMEOUT.num_hours()
            )
        })
        .and_then(|s| parse_abandoned_order_timeout(&s))
        .ok()
        .unwrap_or(DEFAULT_ABANDONED_ORDER_TIMEOUT)
}

/// Parses a timeout given in whole hours. Anything outside `1..=MAX_ABANDONED_ORDER_TIMEOUT_HOURS` is rejected.
fn parse_abandoned_order_timeout(value: &str) -> Result<Duration, ()> {
    let hours = value
        .trim()
        .parse::<i64>()
        .map_err(|e| warn!("🪛️ Invalid configuration value for SHOP_ABANDONED_ORDER_TIMEOUT. {e}"))?;
    if !(1..=MAX_ABANDONED_ORDER_TIMEOUT_HOURS).contains(&hours) {
        warn!(
            "🪛️ SHOP_ABANDONED_ORDER_TIMEOUT must be between 1 and {MAX_ABANDONED_ORDER_TIMEOUT_HOURS} hours, not \
             {hours}."
        );
        return Err(());
    }
    Duration::try_hours(hours).ok_or(())
}

fn configure_sweep_interval() -> std::time::Duration {
    env::var("SHOP_SWEEP_INTERVAL")
        .ok()
        .and_then(|s| {
            s.parse::<u64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for SHOP_SWEEP_INTERVAL. {e}"))
                .ok()
                .filter(|&secs| secs > 0)
        })
        .map(std::time::Duration::from_secs)
        .unwrap_or(DEFAULT_SWEEP_INTERVAL)
}
