//! Report rows (read side only)

use serde::{Deserialize, Serialize};

/// Daily sales per payment method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentMethodSales {
    pub payment_method: String,
    pub order_count: i64,
    pub total_sales: f64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
}

/// Sales for one business-local calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySales {
    /// YYYY-MM-DD
    pub date: String,
    pub order_count: i64,
    pub total_sales: f64,
}

/// Best-selling product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductSales {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub total_quantity: i64,
    pub total_sales: f64,
}

/// Inventory valuation line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryValueLine {
    pub id: i64,
    pub name: String,
    pub current_stock_level: f64,
    pub unit: String,
    pub cost_per_unit: f64,
    pub total_value: f64,
    pub is_low_stock: bool,
}

/// Inventory valuation totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryValueSummary {
    pub total_value: f64,
    pub item_count: usize,
    pub low_stock_count: usize,
}

/// Inventory valuation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryValueReport {
    pub items: Vec<InventoryValueLine>,
    pub summary: InventoryValueSummary,
}

/// Product count per category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryMix {
    pub category: String,
    pub product_count: i64,
    pub available_count: i64,
    pub unavailable_count: i64,
    pub average_price: f64,
}

/// Sales per staff member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserActivity {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub orders_count: i64,
    pub total_sales: f64,
    /// Latest order time, `None` if the user never sold anything
    pub last_active: Option<i64>,
}
