//! Recipe Repository
//!
//! A recipe is the ordered list of inventory ingredients one unit of a product
//! consumes. A product without recipe rows has no inventory impact.

use super::{RepoError, RepoResult};
use crate::orders::money::{to_decimal, to_stock};
use shared::error::ErrorCode;
use shared::models::{Recipe, RecipeIngredient, RecipeIngredientInput};
use sqlx::SqlitePool;

/// Ingredient lines of a product, in recipe order (empty when no recipe)
pub async fn find_ingredients(
    pool: &SqlitePool,
    product_id: i64,
) -> RepoResult<Vec<RecipeIngredient>> {
    let rows = sqlx::query_as::<_, RecipeIngredient>(
        "SELECT ri.inventory_item_id, ii.name AS ingredient_name, ii.unit, ri.quantity FROM recipe_ingredients ri JOIN inventory_items ii ON ii.id = ri.inventory_item_id WHERE ri.product_id = ? ORDER BY ri.position",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Option<Recipe>> {
    let name = sqlx::query_scalar::<_, String>(
        "SELECT name FROM product_recipes WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    let Some(name) = name else {
        return Ok(None);
    };

    Ok(Some(Recipe {
        product_id,
        name,
        ingredients: find_ingredients(pool, product_id).await?,
    }))
}

/// Replace a product's recipe in one transaction
///
/// Quantities are rounded to 3 decimal places and must stay above zero;
/// every ingredient must exist.
pub async fn replace(
    pool: &SqlitePool,
    product_id: i64,
    name: &str,
    ingredients: &[RecipeIngredientInput],
) -> RepoResult<Recipe> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation("Recipe name is required".into()));
    }
    // stock precision, the same rounding the debit uses
    let mut quantities = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        let quantity = if ingredient.quantity.is_finite() {
            to_stock(to_decimal(ingredient.quantity))
        } else {
            0.0
        };
        if quantity <= 0.0 {
            return Err(RepoError::Invalid(
                ErrorCode::RecipeInvalid,
                format!(
                    "Ingredient {} quantity must be at least 0.001, got {}",
                    ingredient.inventory_item_id, ingredient.quantity
                ),
            ));
        }
        quantities.push(quantity);
    }

    let mut tx = pool.begin().await?;

    let product_exists =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;
    if product_exists == 0 {
        return Err(RepoError::NotFound(format!("Product {product_id} not found")));
    }

    for ingredient in ingredients {
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory_items WHERE id = ?")
                .bind(ingredient.inventory_item_id)
                .fetch_one(&mut *tx)
                .await?;
        if exists == 0 {
            return Err(RepoError::NotFound(format!(
                "Inventory item {} not found",
                ingredient.inventory_item_id
            )));
        }
    }

    let now = shared::util::now_millis();
    sqlx::query("DELETE FROM recipe_ingredients WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        "INSERT INTO product_recipes (product_id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) ON CONFLICT(product_id) DO UPDATE SET name = excluded.name, updated_at = excluded.updated_at",
    )
    .bind(product_id)
    .bind(name.trim())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (position, (ingredient, quantity)) in ingredients.iter().zip(quantities).enumerate() {
        sqlx::query(
            "INSERT INTO recipe_ingredients (product_id, position, inventory_item_id, quantity) VALUES (?, ?, ?, ?)",
        )
        .bind(product_id)
        .bind(position as i64)
        .bind(ingredient.inventory_item_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_product(pool, product_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to save recipe".into()))
}
