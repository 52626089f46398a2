//! Order Repository
//!
//! Header and line inserts take `&mut SqliteConnection` so they run inside the
//! Order Engine's transaction. Reads go through the pool.

use super::RepoResult;
use shared::models::{Order, OrderItem, OrderStatus, PaymentMethod};
use sqlx::{SqliteConnection, SqlitePool};

/// Order header columns plus the creator's name
pub const ORDER_COLUMNS: &str = "o.id, o.user_id, IFNULL(u.username, 'Unknown User') AS user_name, o.total_amount, o.payment_method, o.status, o.cash_received, o.created_at, o.updated_at";

/// New order header
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub cash_received: Option<f64>,
    pub created_at: i64,
}

/// New order line, prices already snapshotted
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

pub async fn insert(conn: &mut SqliteConnection, order: &NewOrder) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (user_id, total_amount, payment_method, status, cash_received, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(order.user_id)
    .bind(order.total_amount)
    .bind(order.payment_method)
    .bind(order.status)
    .bind(order.cash_received)
    .bind(order.created_at)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    item: &NewOrderItem,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.subtotal)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders o LEFT JOIN users u ON u.id = o.user_id WHERE o.id = ?"
    );
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Lines of one order with product name and category
pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT oi.id, oi.order_id, oi.product_id, IFNULL(p.name, 'Unknown Product') AS product_name, IFNULL(p.category, '') AS product_category, oi.quantity, oi.unit_price, oi.subtotal FROM order_items oi LEFT JOIN products p ON p.id = oi.product_id WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Newest first, ties broken by id
pub async fn find_page(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders o LEFT JOIN users u ON u.id = o.user_id ORDER BY o.created_at DESC, o.id DESC LIMIT ? OFFSET ?"
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Set the status, returning the previous one (`None` when the order is missing)
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: OrderStatus,
) -> RepoResult<Option<OrderStatus>> {
    let mut tx = pool.begin().await?;

    let previous = sqlx::query_scalar::<_, OrderStatus>("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    if previous.is_some() {
        sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(shared::util::now_millis())
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(previous)
}

/// Delete an order and (by cascade) its lines
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
