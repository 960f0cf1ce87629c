use serde::{Deserialize, Serialize};
use shop_common::DEFAULT_CURRENCY_CODE;

use crate::db_types::{OrderId, Product, VariationDetail};

pub const NO_SIZE_LABEL: &str = "No Size";
pub const NO_COLOR_LABEL: &str = "No Color";

/// One line of the cart as submitted by the storefront. Each line is a single unit; repeated products appear as
/// repeated lines.
///
/// Both fields are optional at this level so that a missing `productId` is reported as a validation failure rather
/// than a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Option<String>,
    pub variation_id: Option<String>,
}

impl CartItem {
    pub fn new<S: Into<String>>(product_id: S) -> Self {
        Self { product_id: Some(product_id.into()), variation_id: None }
    }

    pub fn with_variation<S: Into<String>>(mut self, variation_id: S) -> Self {
        self.variation_id = Some(variation_id.into());
        self
    }
}

/// A cart line that has been matched against the catalog. The variation is always present; if the cart did not name
/// one, the product's default variation was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLine {
    pub product: Product,
    pub variation: VariationDetail,
    pub size_label: String,
    pub color_label: String,
}

impl ValidatedLine {
    pub fn new(product: Product, variation: VariationDetail) -> Self {
        let size_label = variation.size.as_ref().map(|s| s.name.clone()).unwrap_or_else(|| NO_SIZE_LABEL.into());
        let color_label = variation.color.as_ref().map(|c| c.name.clone()).unwrap_or_else(|| NO_COLOR_LABEL.into());
        Self { product, variation, size_label, color_label }
    }

    /// The name shown on the payment page, e.g. "Linen shirt (Large / Blue)".
    pub fn display_name(&self) -> String {
        format!("{} ({} / {})", self.product.name, self.size_label, self.color_label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub order_id: OrderId,
    /// The payment processor's hosted checkout page.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOptions {
    /// Lower-case ISO currency code that every line item is charged in.
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutOptions {
    /// Redirects back to the storefront's cart page, flagging success or cancellation in the query string.
    pub fn for_storefront(storefront_url: &str, currency: &str) -> Self {
        let base = storefront_url.trim_end_matches('/');
        Self {
            currency: currency.to_ascii_lowercase(),
            success_url: format!("{base}/cart?success=1"),
            cancel_url: format!("{base}/cart?canceled=1"),
        }
    }
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self::for_storefront("http://localhost:3001", DEFAULT_CURRENCY_CODE)
    }
}
