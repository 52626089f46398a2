//! Product Repository (Catalog Store)

use super::{RepoError, RepoResult};
use crate::orders::money::to_decimal;
use shared::error::ErrorCode;
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, name, price, category, description, image_url, is_available, created_at, updated_at FROM products";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} ORDER BY category, name");
    let products = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(products)
}

pub async fn find_by_category(pool: &SqlitePool, category: &str) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE category = ? ORDER BY name");
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(category)
        .fetch_all(pool)
        .await?;
    Ok(products)
}

fn validate_name(name: &str) -> RepoResult<()> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation("Product name is required".into()));
    }
    Ok(())
}

/// Positive, whole cents
fn validate_price(price: f64) -> RepoResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(RepoError::Invalid(
            ErrorCode::ProductInvalidPrice,
            format!("Product price must be greater than 0, got {price}"),
        ));
    }
    if to_decimal(price).normalize().scale() > 2 {
        return Err(RepoError::Invalid(
            ErrorCode::ProductInvalidPrice,
            format!("Product price must be in whole cents, got {price}"),
        ));
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    validate_name(&data.name)?;
    validate_price(data.price)?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (name, price, category, description, image_url, is_available, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(data.price)
    .bind(&data.category)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.is_available.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Partial update, absent fields keep their value
pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(name) = &data.name {
        validate_name(name)?;
    }
    if let Some(price) = data.price {
        validate_price(price)?;
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), price = COALESCE(?2, price), category = COALESCE(?3, category), description = COALESCE(?4, description), image_url = COALESCE(?5, image_url), is_available = COALESCE(?6, is_available), updated_at = ?7 WHERE id = ?8",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.price)
    .bind(&data.category)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.is_available)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}
