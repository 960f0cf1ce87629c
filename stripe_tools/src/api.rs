use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::de::DeserializeOwned;

use crate::{CheckoutSession, NewCheckoutSession, StripeApiError, StripeConfig};

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        if config.api_key.is_empty() {
            return Err(StripeApiError::MissingApiKey);
        }
        let mut headers = HeaderMap::with_capacity(1);
        let mut auth = HeaderValue::from_str(format!("Bearer {}", config.api_key.reveal()).as_str())
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Sends a single form-encoded POST. Failures are returned as-is; there are no retries.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, StripeApiError> {
        let url = self.url(path);
        trace!("Sending form POST: {url}");
        let response = self.client.post(url).form(params).send().await.map_err(|e| {
            if e.is_timeout() {
                StripeApiError::Timeout(e.to_string())
            } else {
                StripeApiError::RestResponseError(e.to_string())
            }
        })?;
        if response.status().is_success() {
            trace!("Form POST successful. {}", response.status());
            response.json::<T>().await.map_err(|e| StripeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
            Err(StripeApiError::QueryError { status, message })
        }
    }

    pub async fn create_checkout_session(
        &self,
        session: &NewCheckoutSession,
    ) -> Result<CheckoutSession, StripeApiError> {
        debug!("Creating a checkout session with {} line items", session.line_items.len());
        let result = self.post_form::<CheckoutSession>("/v1/checkout/sessions", &session.to_form_params()).await?;
        info!("Created checkout session {}", result.id);
        Ok(result)
    }
}
