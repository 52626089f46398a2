//! Inventory Repository (Inventory Ledger)
//!
//! Stock never goes below zero: every decrement is a conditional UPDATE that
//! matches no row when the stock is short.

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{InventoryItem, InventoryItemCreate};
use sqlx::{SqliteConnection, SqlitePool};

const ITEM_SELECT: &str = "SELECT id, name, current_stock_level, unit, minimum_stock_level, cost_per_unit, created_at, updated_at FROM inventory_items";

/// Outcome of a guarded stock change
#[derive(Debug, Clone, PartialEq)]
pub enum StockChange {
    /// Applied, new stock level
    Applied { level: f64 },
    /// Rejected, the change would make the stock negative
    Insufficient { name: String, available: f64 },
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<InventoryItem>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let item = sqlx::query_as::<_, InventoryItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<InventoryItem>> {
    let sql = format!("{ITEM_SELECT} WHERE name = ?");
    let item = sqlx::query_as::<_, InventoryItem>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<InventoryItem>> {
    let sql = format!("{ITEM_SELECT} ORDER BY name");
    let items = sqlx::query_as::<_, InventoryItem>(&sql).fetch_all(pool).await?;
    Ok(items)
}

/// Items whose stock is below their minimum
pub async fn find_low_stock(pool: &SqlitePool) -> RepoResult<Vec<InventoryItem>> {
    let sql = format!(
        "{ITEM_SELECT} WHERE current_stock_level < minimum_stock_level ORDER BY current_stock_level - minimum_stock_level, name"
    );
    let items = sqlx::query_as::<_, InventoryItem>(&sql).fetch_all(pool).await?;
    Ok(items)
}

pub async fn create(pool: &SqlitePool, data: InventoryItemCreate) -> RepoResult<InventoryItem> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Inventory item name is required".into()));
    }
    if !data.current_stock_level.is_finite() || data.current_stock_level < 0.0 {
        return Err(RepoError::Invalid(
            ErrorCode::InvalidStockLevel,
            "Current stock level cannot be negative".into(),
        ));
    }
    if !data.minimum_stock_level.is_finite() || data.minimum_stock_level < 0.0 {
        return Err(RepoError::Invalid(
            ErrorCode::InvalidStockLevel,
            "Minimum stock level cannot be negative".into(),
        ));
    }
    if find_by_name(pool, data.name.trim()).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Inventory item '{}' already exists",
            data.name.trim()
        )));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO inventory_items (name, current_stock_level, unit, minimum_stock_level, cost_per_unit, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(data.current_stock_level)
    .bind(&data.unit)
    .bind(data.minimum_stock_level)
    .bind(data.cost_per_unit)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create inventory item".into()))
}

/// Restock (positive delta) or correct down (negative delta)
pub async fn adjust_stock(pool: &SqlitePool, id: i64, delta: f64) -> RepoResult<StockChange> {
    if !delta.is_finite() {
        return Err(RepoError::Validation("Stock delta must be a finite number".into()));
    }

    let now = shared::util::now_millis();
    let level = sqlx::query_scalar::<_, f64>(
        "UPDATE inventory_items SET current_stock_level = ROUND(current_stock_level + ?1, 3), updated_at = ?2 WHERE id = ?3 AND current_stock_level + ?1 >= 0 RETURNING current_stock_level",
    )
    .bind(delta)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match level {
        Some(level) => Ok(StockChange::Applied { level }),
        None => rejected_change(pool, id).await,
    }
}

/// Debit `quantity` inside the caller's transaction
///
/// Matches no row (and changes nothing) when the stock is short, so the
/// caller can roll back with a precise reason.
pub async fn debit_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: f64,
    now: i64,
) -> RepoResult<StockChange> {
    let level = sqlx::query_scalar::<_, f64>(
        "UPDATE inventory_items SET current_stock_level = ROUND(current_stock_level - ?1, 3), updated_at = ?2 WHERE id = ?3 AND current_stock_level >= ?1 RETURNING current_stock_level",
    )
    .bind(quantity)
    .bind(now)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(level) = level {
        return Ok(StockChange::Applied { level });
    }

    let row = sqlx::query_as::<_, (String, f64)>(
        "SELECT name, current_stock_level FROM inventory_items WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some((name, available)) => Ok(StockChange::Insufficient { name, available }),
        None => Err(RepoError::NotFound(format!("Inventory item {id} not found"))),
    }
}

async fn rejected_change(pool: &SqlitePool, id: i64) -> RepoResult<StockChange> {
    match find_by_id(pool, id).await? {
        Some(item) => Ok(StockChange::Insufficient {
            name: item.name,
            available: item.current_stock_level,
        }),
        None => Err(RepoError::NotFound(format!("Inventory item {id} not found"))),
    }
}
