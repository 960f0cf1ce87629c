use serde::{Deserialize, Serialize};
use shop_common::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLineItem {
    pub name: String,
    pub unit_amount: Money,
    pub quantity: u32,
}

/// A request for a one-off payment session, with the customer's billing address and phone number collected on the
/// hosted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCheckoutSession {
    pub currency: String,
    pub line_items: Vec<SessionLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

impl NewCheckoutSession {
    pub fn new(currency: &str, success_url: &str, cancel_url: &str) -> Self {
        Self {
            currency: currency.to_string(),
            line_items: Vec::new(),
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
            metadata: Vec::new(),
        }
    }

    pub fn with_line_item(mut self, name: &str, unit_amount: Money, quantity: u32) -> Self {
        self.line_items.push(SessionLineItem { name: name.to_string(), unit_amount, quantity });
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    /// The API takes form-encoded bodies, with nested fields flattened into bracketed keys.
    pub fn to_form_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("billing_address_collection".to_string(), "required".to_string()),
            ("phone_number_collection[enabled]".to_string(), "true".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
        ];
        for (key, value) in &self.metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }
        for (i, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            params.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
            params.push((format!("{prefix}[price_data][currency]"), self.currency.clone()));
            params.push((format!("{prefix}[price_data][unit_amount]"), item.unit_amount.value().to_string()));
            params.push((format!("{prefix}[price_data][product_data][name]"), item.name.clone()));
        }
        params
    }
}

/// The fields of a created session that the server cares about. `url` is only absent for sessions that are not hosted
/// by Stripe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}
