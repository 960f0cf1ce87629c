//! Unit price resolution.
//!
//! The price charged for a (product, variation) pair is the variation's own price if it has one, otherwise the
//! product's base price. If neither is set the price is zero. A zero price is a data-quality problem, not an error:
//! callers attach a [`PriceDiagnostic`] to their result so the bad record can be found and fixed, and carry on.
//!
//! Resolution is pure. The same inputs always resolve to the same amount.
use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db_types::{Money, OrderId, OrderLine, Product, ProductId, Variation, VariationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// The variation's own price.
    Variation,
    /// The product's base price.
    Product,
    /// The unit price captured on the order item at checkout.
    Snapshot,
    /// No usable price was found. The amount is zero.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub amount: Money,
    pub source: PriceSource,
}

impl ResolvedPrice {
    pub fn missing() -> Self {
        Self { amount: Money::zero(), source: PriceSource::Missing }
    }

    pub fn is_missing(&self) -> bool {
        self.source == PriceSource::Missing
    }
}

pub fn resolve_price(product: &Product, variation: Option<&Variation>) -> ResolvedPrice {
    variation
        .and_then(|v| to_money(v.price))
        .map(|amount| ResolvedPrice { amount, source: PriceSource::Variation })
        .or_else(|| to_money(product.price).map(|amount| ResolvedPrice { amount, source: PriceSource::Product }))
        .unwrap_or_else(ResolvedPrice::missing)
}

/// Prices too large to be charged are treated as absent.
fn to_money(price: Option<Decimal>) -> Option<Money> {
    price.and_then(|p| Money::from_decimal(p).ok())
}

/// A line item that was priced at zero because no price could be found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDiagnostic {
    pub order_id: OrderId,
    pub order_item_id: i64,
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub reason: String,
}

impl Display for PriceDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No price found for order item {} of order {} (product {}, variation {}). {}",
            self.order_item_id,
            self.order_id,
            self.product_id,
            self.variation_id.as_ref().map(|v| v.as_str()).unwrap_or("none"),
            self.reason
        )
    }
}

/// Prices a stored order line.
///
/// The unit price captured at checkout wins. Lines without one fall back to resolving the price from the current
/// catalog records. A diagnostic is returned whenever the line ends up priced at zero for lack of data.
pub fn price_order_line(order_id: &OrderId, line: &OrderLine) -> (ResolvedPrice, Option<PriceDiagnostic>) {
    if let Some(amount) = line.item.unit_price {
        return (ResolvedPrice { amount, source: PriceSource::Snapshot }, None);
    }
    let diagnostic = |reason: &str| PriceDiagnostic {
        order_id: order_id.clone(),
        order_item_id: line.item.id,
        product_id: line.item.product_id.clone(),
        variation_id: line.item.variation_id.clone(),
        reason: reason.to_string(),
    };
    match &line.product {
        Some(product) => {
            let resolved = resolve_price(product, line.variation.as_ref());
            let diag = resolved.is_missing().then(|| diagnostic("Neither the variation nor the product has a price"));
            (resolved, diag)
        },
        None => (ResolvedPrice::missing(), Some(diagnostic("The product no longer exists"))),
    }
}
