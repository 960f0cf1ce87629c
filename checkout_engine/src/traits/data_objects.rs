use serde::{Deserialize, Serialize};

use crate::db_types::{Money, OrderId};

/// One entry on the payment processor's checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLineItem {
    pub name: String,
    /// Price per unit, in minor currency units.
    pub unit_amount: Money,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSessionRequest {
    /// Attached to the session as metadata so that the payment confirmation can be matched back to the order.
    pub order_id: OrderId,
    pub currency: String,
    pub line_items: Vec<PaymentLineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

impl PaymentSessionRequest {
    pub fn total(&self) -> Money {
        self.line_items.iter().map(|li| li.unit_amount * i64::from(li.quantity)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub id: String,
    /// Where the customer is redirected to pay.
    pub url: String,
}
