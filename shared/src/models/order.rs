//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method (recorded, not processed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }

    /// Parse the wire value, `None` for anything but `cash` / `card`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order header
///
/// `user_name` comes from a LEFT JOIN on users ("Unknown User" when the
/// creator no longer exists). `items` is only filled by single-order reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    /// Sum of line subtotals, immutable once created
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Cash orders only
    pub cash_received: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub items: Vec<OrderItem>,
}

/// Order line with the product name/category joined in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_category: String,
    pub quantity: i64,
    /// Catalog price at order time
    pub unit_price: f64,
    /// quantity * unit_price
    pub subtotal: f64,
}

/// Order returned by create / get-by-id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    /// cash_received - total_amount, cash orders only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
}

/// Cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i64,
}

/// Create order payload
///
/// `payment_method` stays a raw string so that an unknown method is reported
/// as a typed validation error instead of a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    pub payment_method: String,
    #[serde(default)]
    pub cash_received: Option<f64>,
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}
