//! Order Engine
//!
//! Creates an order as one all-or-nothing unit:
//!
//! ```text
//! validate cart ─▶ price lines (snapshot) ─▶ expand recipes ─▶ advisory stock check
//!        │
//!        ▼
//! BEGIN ─▶ conditional debit per ingredient ─▶ INSERT order ─▶ INSERT items ─▶ COMMIT
//! ```
//!
//! The debits are the first writes of the transaction. On SQLite the first
//! write takes the database write lock until commit, so two orders competing
//! for the same ingredient run one after the other and the second one sees
//! the first one's debit. A debit that would go negative matches no row and
//! the whole transaction is dropped (rolled back).

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use shared::Pagination;
use shared::models::{
    LogCategory, Order, OrderCreate, OrderDetail, OrderItemInput, OrderStatus, PaymentMethod,
    Product, RecipeIngredient,
};
use sqlx::SqlitePool;

use super::error::{OrderError, OrderResult};
use super::money::{
    change_due, line_subtotal, round_money, to_decimal, to_money, validate_cash_received,
    validate_items,
};
use super::requirements::Requirements;
use crate::audit::AuditService;
use crate::db::repository::inventory::{self, StockChange};
use crate::db::repository::order::{self as order_repo, NewOrder, NewOrderItem};
use crate::db::repository::{product, recipe, user};
use crate::search::PageRequest;

/// Orders are booked as completed at creation (single-stage fulfillment)
const INITIAL_STATUS: OrderStatus = OrderStatus::Completed;

/// Priced cart, ready to persist
#[derive(Debug, Clone)]
struct PricedOrder {
    lines: Vec<NewOrderItem>,
    total: Decimal,
}

/// Order Engine
#[derive(Clone)]
pub struct OrderEngine {
    pool: SqlitePool,
    audit: Arc<AuditService>,
}

impl std::fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEngine").finish_non_exhaustive()
    }
}

impl OrderEngine {
    pub fn new(pool: SqlitePool, audit: Arc<AuditService>) -> Self {
        Self { pool, audit }
    }

    /// Create an order for `creator_id`
    ///
    /// Any error leaves no order row, no item rows and no stock change behind.
    pub async fn create_order(
        &self,
        creator_id: i64,
        input: OrderCreate,
    ) -> OrderResult<OrderDetail> {
        // 1. Shape of the request, before any storage access
        validate_items(&input.items)?;
        let payment_method = PaymentMethod::parse(&input.payment_method)
            .ok_or_else(|| OrderError::InvalidPaymentMethod(input.payment_method.clone()))?;
        let cash_received = match payment_method {
            PaymentMethod::Cash => {
                let cash = input.cash_received.ok_or(OrderError::MissingCashReceived)?;
                Some(validate_cash_received(cash)?)
            }
            // 刷卡不记录实收金额
            PaymentMethod::Card => None,
        };

        if user::find_by_id(&self.pool, creator_id).await?.is_none() {
            return Err(OrderError::CreatorNotFound(creator_id));
        }

        // 2. Price every line from the current catalog
        let products = self.load_products(&input.items).await?;
        let priced = price_lines(&input.items, &products)?;

        if let Some(cash) = cash_received
            && change_due(cash, priced.total).is_none()
        {
            return Err(OrderError::InsufficientPayment {
                total: to_money(priced.total),
                received: to_money(cash),
            });
        }

        // 3. Combined ingredient demand across all lines
        let requirements = self.expand_recipes(&input.items, &products).await?;

        // 4. Advisory check, re-enforced by the conditional debit below
        self.check_stock(&requirements).await?;

        // 5. Debit + persist atomically
        let order = NewOrder {
            user_id: creator_id,
            total_amount: to_money(priced.total),
            payment_method,
            status: INITIAL_STATUS,
            cash_received: cash_received.map(to_money),
            created_at: shared::util::now_millis(),
        };

        let order_id = match self.commit_order(&order, &priced.lines, &requirements).await {
            Ok(id) => id,
            Err(e) => {
                if e.is_storage() {
                    tracing::error!(user_id = creator_id, error = %e, "Order transaction failed");
                    self.audit.error(
                        LogCategory::Order,
                        "Order creation failed",
                        json!({ "error": e.to_string(), "item_count": input.items.len() }),
                        Some(creator_id),
                    );
                }
                return Err(e);
            }
        };

        // 6. Audit
        tracing::info!(
            order_id,
            user_id = creator_id,
            total = order.total_amount,
            items = priced.lines.len(),
            "Order created"
        );
        self.audit.info(
            LogCategory::Order,
            format!("Order #{order_id} created"),
            json!({
                "order_id": order_id,
                "item_count": priced.lines.len(),
                "total_amount": order.total_amount,
                "payment_method": payment_method.as_str(),
            }),
            Some(creator_id),
        );

        self.get_by_id(order_id).await
    }

    /// Set an order's status, any value of the enum is accepted
    ///
    /// Stock is neither re-credited nor debited again.
    pub async fn update_status(
        &self,
        actor_id: i64,
        order_id: i64,
        status: &str,
    ) -> OrderResult<OrderDetail> {
        let new_status =
            OrderStatus::parse(status).ok_or_else(|| OrderError::InvalidStatus(status.into()))?;

        let previous = order_repo::update_status(&self.pool, order_id, new_status)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        tracing::info!(order_id, from = %previous, to = %new_status, "Order status updated");
        self.audit.info(
            LogCategory::Order,
            format!("Order #{order_id} status changed from {previous} to {new_status}"),
            json!({
                "order_id": order_id,
                "old_status": previous.as_str(),
                "new_status": new_status.as_str(),
            }),
            Some(actor_id),
        );

        self.get_by_id(order_id).await
    }

    /// Order header with its lines and, for cash orders, the change given
    pub async fn get_by_id(&self, order_id: i64) -> OrderResult<OrderDetail> {
        let mut order = order_repo::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        order.items = order_repo::find_items(&self.pool, order_id).await?;
        Ok(detail(order))
    }

    /// Newest first, without nested items
    pub async fn list_paged(&self, page: PageRequest) -> OrderResult<(Vec<Order>, Pagination)> {
        let total = order_repo::count(&self.pool).await?;
        let orders = order_repo::find_page(&self.pool, page.limit(), page.offset()).await?;
        Ok((orders, page.pagination(total)))
    }

    /// Admin delete, lines cascade; stock is not re-credited
    pub async fn delete_order(&self, actor_id: i64, order_id: i64) -> OrderResult<()> {
        if !order_repo::delete(&self.pool, order_id).await? {
            return Err(OrderError::OrderNotFound(order_id));
        }

        tracing::info!(order_id, actor_id, "Order deleted");
        self.audit.info(
            LogCategory::Order,
            format!("Order #{order_id} deleted"),
            json!({ "order_id": order_id }),
            Some(actor_id),
        );
        Ok(())
    }

    /// Distinct products of the cart, all present and available
    async fn load_products(&self, items: &[OrderItemInput]) -> OrderResult<HashMap<i64, Product>> {
        let mut products = HashMap::new();
        for item in items {
            if products.contains_key(&item.product_id) {
                continue;
            }
            let product = product::find_by_id(&self.pool, item.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(item.product_id))?;
            if !product.is_available {
                return Err(OrderError::ProductUnavailable {
                    product_id: product.id,
                    name: product.name,
                });
            }
            products.insert(item.product_id, product);
        }
        Ok(products)
    }

    async fn expand_recipes(
        &self,
        items: &[OrderItemInput],
        products: &HashMap<i64, Product>,
    ) -> OrderResult<Requirements> {
        let mut recipes: HashMap<i64, Vec<RecipeIngredient>> = HashMap::with_capacity(products.len());
        for product_id in products.keys() {
            let ingredients = recipe::find_ingredients(&self.pool, *product_id).await?;
            recipes.insert(*product_id, ingredients);
        }

        let mut requirements = Requirements::new();
        for item in items {
            if let Some(ingredients) = recipes.get(&item.product_id) {
                requirements.add_line(ingredients, item.quantity);
            }
        }
        Ok(requirements)
    }

    /// Fail fast with the first short ingredient
    async fn check_stock(&self, requirements: &Requirements) -> OrderResult<()> {
        for (ingredient_id, needed) in requirements.iter() {
            let item = inventory::find_by_id(&self.pool, ingredient_id)
                .await?
                .ok_or(OrderError::IngredientNotFound(ingredient_id))?;
            // same value and comparison as the conditional debit
            let required = needed.required();
            if item.current_stock_level < required {
                tracing::debug!(
                    ingredient_id,
                    required,
                    available = item.current_stock_level,
                    unit = %needed.unit,
                    "Insufficient stock"
                );
                return Err(OrderError::InsufficientStock {
                    ingredient_id,
                    ingredient: needed.name.clone(),
                    required,
                    available: item.current_stock_level,
                });
            }
        }
        Ok(())
    }

    /// The write transaction: debits first, then header and lines
    async fn commit_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderItem],
        requirements: &Requirements,
    ) -> OrderResult<i64> {
        let mut tx = self.pool.begin().await?;

        for (ingredient_id, needed) in requirements.iter() {
            let required = needed.required();
            match inventory::debit_stock(&mut *tx, ingredient_id, required, order.created_at)
                .await?
            {
                StockChange::Applied { level } => {
                    tracing::debug!(
                        ingredient_id,
                        required,
                        remaining = level,
                        unit = %needed.unit,
                        "Stock debited"
                    );
                }
                StockChange::Insufficient { name, available } => {
                    tracing::warn!(
                        ingredient_id,
                        required,
                        available,
                        "Stock taken by a concurrent order, rolling back"
                    );
                    // dropping `tx` rolls back the debits applied so far
                    return Err(OrderError::InsufficientStock {
                        ingredient_id,
                        ingredient: name,
                        required,
                        available,
                    });
                }
            }
        }

        let order_id = order_repo::insert(&mut *tx, order).await?;
        for line in lines {
            order_repo::insert_item(&mut *tx, order_id, line).await?;
        }

        tx.commit().await?;
        Ok(order_id)
    }
}

/// Price each line at the current catalog price
///
/// Each subtotal is rounded to cents first and the total is the sum of the
/// rounded subtotals, so it always equals the sum of the stored lines.
fn price_lines(
    items: &[OrderItemInput],
    products: &HashMap<i64, Product>,
) -> OrderResult<PricedOrder> {
    let mut lines = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for item in items {
        let product = products
            .get(&item.product_id)
            .ok_or(OrderError::ProductNotFound(item.product_id))?;
        let subtotal = round_money(line_subtotal(product.price, item.quantity));
        total += subtotal;
        lines.push(NewOrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: product.price,
            subtotal: to_money(subtotal),
        });
    }

    Ok(PricedOrder { lines, total })
}

fn detail(order: Order) -> OrderDetail {
    let change = match (order.payment_method, order.cash_received) {
        (PaymentMethod::Cash, Some(cash)) => {
            change_due(to_decimal(cash), to_decimal(order.total_amount)).map(to_money)
        }
        _ => None,
    };
    OrderDetail { order, change }
}
