//! Shared fixtures for the integration tests
//!
//! Seeded catalog:
//!
//! | product | price | recipe |
//! |---------|-------|--------|
//! | Latte | 3.50 | milk 1 |
//! | Cappuccino | 4.00 | milk 0.5, beans 18 |
//! | Drip Coffee | 3.00 | beans 15 |
//! | Muffin | 2.50 | (none) |
//! | Seasonal Tart | 5.00 | unavailable |
//!
//! Stock: milk 10 l, beans 1000 g.

#![allow(dead_code)]

use std::sync::Arc;

use pos_server::audit::{AuditLogRequest, AuditService, AuditWorker};
use pos_server::db::DbService;
use pos_server::db::repository::order::{self as order_repo, NewOrder, NewOrderItem};
use pos_server::db::repository::{inventory, product, recipe, user};
use pos_server::{Config, JwtService, OrderEngine};
use shared::models::{
    InventoryItemCreate, OrderCreate, OrderItemInput, OrderStatus, PaymentMethod, ProductCreate,
    ProductUpdate, RecipeIngredientInput, User, UserCreate, UserRole,
};
use sqlx::SqlitePool;
use tokio::sync::mpsc::Receiver;

pub struct Fixture {
    pub pool: SqlitePool,
    pub cashier: User,
    pub manager: User,
    pub admin: User,
    pub milk: i64,
    pub beans: i64,
    pub latte: i64,
    pub cappuccino: i64,
    pub drip: i64,
    pub muffin: i64,
    pub tart: i64,
}

/// In-memory database with the seeded catalog
pub async fn setup() -> Fixture {
    let db = DbService::open_in_memory()
        .await
        .expect("Failed to open in-memory database");
    seed(db.pool).await
}

/// File-backed database (WAL, several connections) with the seeded catalog
pub async fn setup_file(dir: &tempfile::TempDir, max_connections: u32) -> Fixture {
    let path = dir.path().join("pos.db");
    let db = DbService::new(path.to_str().expect("utf-8 path"), max_connections)
        .await
        .expect("Failed to open file database");
    seed(db.pool).await
}

async fn create_user(pool: &SqlitePool, username: &str, role: UserRole) -> User {
    user::create(
        pool,
        UserCreate {
            username: username.into(),
            email: format!("{username}@example.com"),
            first_name: username.into(),
            last_name: "Test".into(),
            role,
        },
    )
    .await
    .expect("Failed to create user")
}

async fn create_product(pool: &SqlitePool, name: &str, price: f64, category: &str) -> i64 {
    product::create(
        pool,
        ProductCreate {
            name: name.into(),
            price,
            category: category.into(),
            description: None,
            image_url: None,
            is_available: Some(true),
        },
    )
    .await
    .expect("Failed to create product")
    .id
}

async fn create_item(pool: &SqlitePool, name: &str, stock: f64, unit: &str, cost: f64) -> i64 {
    inventory::create(
        pool,
        InventoryItemCreate {
            name: name.into(),
            current_stock_level: stock,
            unit: unit.into(),
            minimum_stock_level: 2.0,
            cost_per_unit: Some(cost),
        },
    )
    .await
    .expect("Failed to create inventory item")
    .id
}

fn ingredient(inventory_item_id: i64, quantity: f64) -> RecipeIngredientInput {
    RecipeIngredientInput {
        inventory_item_id,
        quantity,
    }
}

async fn seed(pool: SqlitePool) -> Fixture {
    let cashier = create_user(&pool, "casey", UserRole::Cashier).await;
    let manager = create_user(&pool, "morgan", UserRole::Manager).await;
    let admin = create_user(&pool, "alex", UserRole::Admin).await;

    let milk = create_item(&pool, "Milk", 10.0, "l", 1.2).await;
    let beans = create_item(&pool, "Espresso Beans", 1000.0, "g", 0.03).await;

    let latte = create_product(&pool, "Latte", 3.5, "coffee").await;
    let cappuccino = create_product(&pool, "Cappuccino", 4.0, "coffee").await;
    let drip = create_product(&pool, "Drip Coffee", 3.0, "coffee").await;
    let muffin = create_product(&pool, "Muffin", 2.5, "pastry").await;
    let tart = create_product(&pool, "Seasonal Tart", 5.0, "pastry").await;
    product::update(
        &pool,
        tart,
        ProductUpdate {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to mark product unavailable");

    recipe::replace(&pool, latte, "Latte", &[ingredient(milk, 1.0)])
        .await
        .expect("Failed to set recipe");
    recipe::replace(
        &pool,
        cappuccino,
        "Cappuccino",
        &[ingredient(milk, 0.5), ingredient(beans, 18.0)],
    )
    .await
    .expect("Failed to set recipe");
    recipe::replace(&pool, drip, "Drip Coffee", &[ingredient(beans, 15.0)])
        .await
        .expect("Failed to set recipe");

    Fixture {
        pool,
        cashier,
        manager,
        admin,
        milk,
        beans,
        latte,
        cappuccino,
        drip,
        muffin,
        tart,
    }
}

/// Engine with the audit channel left undrained so tests can inspect it
pub fn engine(pool: &SqlitePool) -> (OrderEngine, Arc<AuditService>, Receiver<AuditLogRequest>) {
    let (audit, rx) = AuditService::new(pool.clone(), 64);
    (OrderEngine::new(pool.clone(), audit.clone()), audit, rx)
}

/// Persist everything queued on the audit channel
pub async fn drain_audit(pool: &SqlitePool, rx: &mut Receiver<AuditLogRequest>) -> usize {
    let worker = AuditWorker::new(pool.clone());
    let mut written = 0;
    while let Ok(req) = rx.try_recv() {
        worker.write(req).await;
        written += 1;
    }
    written
}

pub fn line(product_id: i64, quantity: i64) -> OrderItemInput {
    OrderItemInput {
        product_id,
        quantity,
    }
}

pub fn card_order(items: Vec<OrderItemInput>) -> OrderCreate {
    OrderCreate {
        items,
        payment_method: "card".into(),
        cash_received: None,
    }
}

pub fn cash_order(items: Vec<OrderItemInput>, cash_received: f64) -> OrderCreate {
    OrderCreate {
        items,
        payment_method: "cash".into(),
        cash_received: Some(cash_received),
    }
}

pub async fn stock_of(pool: &SqlitePool, id: i64) -> f64 {
    sqlx::query_scalar::<_, f64>("SELECT current_stock_level FROM inventory_items WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("inventory row")
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count")
}

/// Insert a historical order directly, bypassing the engine
pub async fn insert_order(
    pool: &SqlitePool,
    user_id: i64,
    payment_method: PaymentMethod,
    status: OrderStatus,
    created_at: i64,
    lines: &[(i64, i64, f64)],
) -> i64 {
    let total: f64 = lines.iter().map(|(_, q, p)| *q as f64 * p).sum();
    let mut tx = pool.begin().await.expect("begin");
    let order_id = order_repo::insert(
        &mut *tx,
        &NewOrder {
            user_id,
            total_amount: (total * 100.0).round() / 100.0,
            payment_method,
            status,
            cash_received: None,
            created_at,
        },
    )
    .await
    .expect("insert order");
    for (product_id, quantity, unit_price) in lines {
        order_repo::insert_item(
            &mut *tx,
            order_id,
            &NewOrderItem {
                product_id: *product_id,
                quantity: *quantity,
                unit_price: *unit_price,
                subtotal: *quantity as f64 * unit_price,
            },
        )
        .await
        .expect("insert item");
    }
    tx.commit().await.expect("commit");
    order_id
}

/// Bearer token for a seeded user, signed with the test configuration
pub fn token_for(user: &User) -> String {
    JwtService::with_config(Config::for_tests().jwt)
        .generate_token(user.id, &user.username, user.role)
        .expect("Failed to generate token")
}
