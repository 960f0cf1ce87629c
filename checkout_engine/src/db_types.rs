use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
pub use shop_common::Money;
use sqlx::{FromRow, Type};
use thiserror::Error;

/// Declares a string-backed identifier newtype that can be bound directly in queries and used as a path parameter.
macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(StoreId);
string_id!(ProductId);
string_id!(VariationId);
string_id!(OrderId);

impl OrderId {
    /// Generates a fresh, random order id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

//--------------------------------------        Store        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    /// The id of the user who owns the store, as issued by the authentication provider.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------   Size / Color      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: String,
    pub store_id: StoreId,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: String,
    pub store_id: StoreId,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub store_id: StoreId,
    pub name: String,
}

//--------------------------------------       Product       ---------------------------------------------------------
/// A catalog product. `price` is the base price, used when a variation carries no price of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: String,
    pub name: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub is_featured: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      Variation      ---------------------------------------------------------
/// A sellable size/color combination of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: VariationId,
    pub product_id: ProductId,
    pub size_id: Option<String>,
    pub color_id: Option<String>,
    pub price: Option<Decimal>,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

/// A variation together with its size and color records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationDetail {
    #[serde(flatten)]
    pub variation: Variation,
    pub size: Option<Size>,
    pub color: Option<Color>,
}

/// A product with its variations, in creation order. The first variation is the default variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    #[serde(flatten)]
    pub product: Product,
    pub variations: Vec<VariationDetail>,
}

impl CatalogProduct {
    pub fn default_variation(&self) -> Option<&VariationDetail> {
        self.variations.first()
    }

    pub fn find_variation(&self, id: &VariationId) -> Option<&VariationDetail> {
        self.variations.iter().find(|v| &v.variation.id == id)
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been persisted, but no payment session exists for it yet.
    Pending,
    /// A payment session was created and the customer has been redirected to it.
    AwaitingPayment,
    /// Payment was confirmed by the payment processor. Terminal.
    Paid,
    /// The order sat unpaid for too long and was swept up.
    Abandoned,
}

impl OrderStatusType {
    /// The order lifecycle. `Paid` is terminal, and an abandoned order can still be paid, since the customer may
    /// complete a payment session after the sweep has run.
    pub fn can_transition_to(&self, new_status: OrderStatusType) -> bool {
        use OrderStatusType::*;
        matches!(
            (self, new_status),
            (Pending, AwaitingPayment) |
                (Pending, Paid) |
                (Pending, Abandoned) |
                (AwaitingPayment, Paid) |
                (AwaitingPayment, Abandoned) |
                (Abandoned, Paid)
        )
    }

    /// Statuses that the abandoned order sweep picks up.
    pub fn unpaid() -> [OrderStatusType; 2] {
        [OrderStatusType::Pending, OrderStatusType::AwaitingPayment]
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::AwaitingPayment => write!(f, "AwaitingPayment"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Abandoned => write!(f, "Abandoned"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "AwaitingPayment" => Ok(Self::AwaitingPayment),
            "Paid" => Ok(Self::Paid),
            "Abandoned" => Ok(Self::Abandoned),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub status: OrderStatusType,
    /// Filled in from the payment processor's hosted checkout once the order is paid.
    pub phone: String,
    pub address: String,
    pub payment_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.status == OrderStatusType::Paid
    }
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: OrderId,
    /// Zero-based index of the line in the cart that produced this item.
    pub position: i64,
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    /// The unit price charged at checkout. `None` only for rows written before prices were captured on the order.
    pub unit_price: Option<Money>,
}

/// An order item together with the catalog records it refers to. Either record may have been removed from the
/// catalog since the order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item: OrderItem,
    pub product: Option<Product>,
    pub variation: Option<Variation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub store_id: StoreId,
    pub created_at: DateTime<Utc>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub unit_price: Money,
}

impl NewOrder {
    pub fn new(store_id: StoreId) -> Self {
        Self { id: OrderId::random(), store_id, created_at: Utc::now(), items: Vec::new() }
    }

    pub fn with_item(mut self, product_id: ProductId, variation_id: Option<VariationId>, unit_price: Money) -> Self {
        self.items.push(NewOrderItem { product_id, variation_id, unit_price });
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Customer details collected by the payment processor's hosted checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub address: String,
    pub phone: String,
}
