//! Inventory Model

use serde::{Deserialize, Serialize};

/// Raw ingredient tracked by the inventory ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    /// Unique
    pub name: String,
    pub current_stock_level: f64,
    pub unit: String,
    pub minimum_stock_level: f64,
    pub cost_per_unit: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl InventoryItem {
    /// Low stock is derived, never stored
    pub fn is_low_stock(&self) -> bool {
        self.current_stock_level < self.minimum_stock_level
    }
}

/// Create inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    pub name: String,
    #[serde(default)]
    pub current_stock_level: f64,
    pub unit: String,
    #[serde(default)]
    pub minimum_stock_level: f64,
    #[serde(default)]
    pub cost_per_unit: Option<f64>,
}

/// Stock adjustment payload (positive restocks, negative corrects down)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub delta: f64,
}
