//! Product and Recipe Models

use serde::{Deserialize, Serialize};

/// Product entity (catalog row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price, always > 0
    pub price: f64,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

/// Update product payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// One recipe line joined with its inventory item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecipeIngredient {
    pub inventory_item_id: i64,
    pub ingredient_name: String,
    pub unit: String,
    /// Quantity consumed per unit of product sold, always > 0
    pub quantity: f64,
}

/// Recipe input line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    pub inventory_item_id: i64,
    pub quantity: f64,
}

/// A product's full recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub product_id: i64,
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
}
