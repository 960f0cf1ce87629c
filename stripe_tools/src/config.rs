use std::time::Duration;

use log::*;
use shop_common::Secret;

const DEFAULT_API_URL: &str = "https://api.stripe.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub api_key: Secret<String>,
    /// Base URL of the API, without a trailing slash.
    pub api_url: String,
    /// Upper bound on a single request, connection included.
    pub timeout: Duration,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self { api_key: Secret::default(), api_url: DEFAULT_API_URL.to_string(), timeout: DEFAULT_TIMEOUT }
    }
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_key = std::env::var("SHOP_STRIPE_API_KEY").map(Secret::new).unwrap_or_else(|_| {
            warn!("SHOP_STRIPE_API_KEY is not set. Payment sessions cannot be created without it.");
            Secret::default()
        });
        let api_url = std::env::var("SHOP_STRIPE_API_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = std::env::var("SHOP_STRIPE_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid SHOP_STRIPE_TIMEOUT value '{s}': {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self { api_key, api_url, timeout }
    }
}
