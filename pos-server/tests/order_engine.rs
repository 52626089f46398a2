//! Order Engine integration tests
//!
//! Run against a real SQLite database; stock and order rows are checked by
//! reading the tables directly.

mod common;

use common::*;
use pos_server::OrderError;
use pos_server::db::repository::{RepoError, product, recipe};
use shared::error::ErrorCode;
use shared::models::{LogCategory, OrderStatus, PaymentMethod, ProductUpdate, RecipeIngredientInput};

#[tokio::test]
async fn test_order_debits_recipe_stock() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let order = engine
        .create_order(f.cashier.id, card_order(vec![line(f.latte, 4)]))
        .await
        .unwrap();

    assert_eq!(order.order.total_amount, 14.0);
    assert_eq!(order.order.status, OrderStatus::Completed);
    assert_eq!(order.order.payment_method, PaymentMethod::Card);
    assert_eq!(order.order.cash_received, None);
    assert_eq!(order.change, None);
    assert_eq!(order.order.user_name, "casey");
    assert_eq!(order.order.items.len(), 1);
    assert_eq!(order.order.items[0].product_name, "Latte");
    assert_eq!(order.order.items[0].product_category, "coffee");
    assert_eq!(order.order.items[0].unit_price, 3.5);
    assert_eq!(order.order.items[0].subtotal, 14.0);

    assert_eq!(stock_of(&f.pool, f.milk).await, 6.0);
}

#[tokio::test]
async fn test_insufficient_stock_leaves_no_trace() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let err = engine
        .create_order(f.cashier.id, card_order(vec![line(f.latte, 12)]))
        .await
        .unwrap_err();

    match err {
        OrderError::InsufficientStock {
            ingredient,
            required,
            available,
            ..
        } => {
            assert_eq!(ingredient, "Milk");
            assert_eq!(required, 12.0);
            assert_eq!(available, 10.0);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(stock_of(&f.pool, f.milk).await, 10.0);
    assert_eq!(count_rows(&f.pool, "orders").await, 0);
    assert_eq!(count_rows(&f.pool, "order_items").await, 0);
}

#[tokio::test]
async fn test_short_second_ingredient_rolls_back_first() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    // Milk suffices (5 × 0.5 = 2.5) but beans do not (5 × 18 + 61 × 15 > 1000)
    let err = engine
        .create_order(
            f.cashier.id,
            card_order(vec![line(f.cappuccino, 5), line(f.drip, 61)]),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrderError::InsufficientStock { ingredient_id, .. } if ingredient_id == f.beans
    ));
    assert_eq!(stock_of(&f.pool, f.milk).await, 10.0);
    assert_eq!(stock_of(&f.pool, f.beans).await, 1000.0);
    assert_eq!(count_rows(&f.pool, "orders").await, 0);
    assert_eq!(count_rows(&f.pool, "order_items").await, 0);
}

#[tokio::test]
async fn test_shared_ingredient_checked_against_combined_total() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    // 8 lattes need 8 milk, 6 cappuccinos need 3 more: 11 > 10 even though
    // each line alone would fit
    let err = engine
        .create_order(
            f.cashier.id,
            card_order(vec![line(f.latte, 8), line(f.cappuccino, 6)]),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InsufficientStock { required, available, .. }
            if required == 11.0 && available == 10.0
    ));
    assert_eq!(stock_of(&f.pool, f.milk).await, 10.0);

    // 6 lattes + 4 cappuccinos = 8 milk, 72 beans
    let order = engine
        .create_order(
            f.cashier.id,
            card_order(vec![line(f.latte, 6), line(f.cappuccino, 4)]),
        )
        .await
        .unwrap();
    assert_eq!(order.order.total_amount, 37.0);
    assert_eq!(stock_of(&f.pool, f.milk).await, 2.0);
    assert_eq!(stock_of(&f.pool, f.beans).await, 928.0);
}

#[tokio::test]
async fn test_repeated_product_lines_are_summed() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let order = engine
        .create_order(
            f.cashier.id,
            card_order(vec![line(f.latte, 2), line(f.muffin, 1), line(f.latte, 3)]),
        )
        .await
        .unwrap();

    assert_eq!(order.order.items.len(), 3);
    assert_eq!(order.order.total_amount, 20.0);
    assert_eq!(stock_of(&f.pool, f.milk).await, 5.0);
}

#[tokio::test]
async fn test_product_without_recipe_touches_no_stock() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let order = engine
        .create_order(f.cashier.id, card_order(vec![line(f.muffin, 3)]))
        .await
        .unwrap();

    assert_eq!(order.order.total_amount, 7.5);
    assert_eq!(stock_of(&f.pool, f.milk).await, 10.0);
    assert_eq!(stock_of(&f.pool, f.beans).await, 1000.0);
}

#[tokio::test]
async fn test_cash_change_and_insufficient_payment() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let order = engine
        .create_order(f.cashier.id, cash_order(vec![line(f.drip, 3)], 10.0))
        .await
        .unwrap();
    assert_eq!(order.order.total_amount, 9.0);
    assert_eq!(order.order.cash_received, Some(10.0));
    assert_eq!(order.change, Some(1.0));

    let beans_after_first = stock_of(&f.pool, f.beans).await;
    let err = engine
        .create_order(f.cashier.id, cash_order(vec![line(f.drip, 3)], 8.0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InsufficientPayment { total, received } if total == 9.0 && received == 8.0
    ));
    assert_eq!(count_rows(&f.pool, "orders").await, 1);
    assert_eq!(stock_of(&f.pool, f.beans).await, beans_after_first);
}

#[tokio::test]
async fn test_exact_cash_gives_zero_change() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let order = engine
        .create_order(f.cashier.id, cash_order(vec![line(f.latte, 2)], 7.0))
        .await
        .unwrap();
    assert_eq!(order.change, Some(0.0));
}

#[tokio::test]
async fn test_price_snapshot_survives_price_change() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let order = engine
        .create_order(f.cashier.id, card_order(vec![line(f.latte, 2)]))
        .await
        .unwrap();

    product::update(
        &f.pool,
        f.latte,
        ProductUpdate {
            price: Some(4.25),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let reloaded = engine.get_by_id(order.order.id).await.unwrap();
    assert_eq!(reloaded.order.total_amount, 7.0);
    assert_eq!(reloaded.order.items[0].unit_price, 3.5);

    let later = engine
        .create_order(f.cashier.id, card_order(vec![line(f.latte, 2)]))
        .await
        .unwrap();
    assert_eq!(later.order.total_amount, 8.5);
}

#[tokio::test]
async fn test_total_equals_sum_of_stored_subtotals() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let err = product::update(
        &f.pool,
        f.muffin,
        ProductUpdate {
            price: Some(0.125),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Invalid(ErrorCode::ProductInvalidPrice, _)));

    // a sub-cent price already in the catalog
    sqlx::query("UPDATE products SET price = 0.125 WHERE id = ?")
        .bind(f.muffin)
        .execute(&f.pool)
        .await
        .unwrap();

    let order = engine
        .create_order(
            f.cashier.id,
            card_order(vec![line(f.muffin, 1), line(f.muffin, 1)]),
        )
        .await
        .unwrap();

    let subtotals: f64 = order.order.items.iter().map(|i| i.subtotal).sum();
    assert_eq!(order.order.items[0].subtotal, 0.13);
    assert_eq!(order.order.total_amount, 0.26);
    assert_eq!(order.order.total_amount, subtotals);

    let (stored_total, stored_sum) = sqlx::query_as::<_, (f64, f64)>(
        "SELECT o.total_amount, SUM(oi.subtotal) FROM orders o JOIN order_items oi ON oi.order_id = o.id WHERE o.id = ? GROUP BY o.id",
    )
    .bind(order.order.id)
    .fetch_one(&f.pool)
    .await
    .unwrap();
    assert_eq!(stored_total, stored_sum);
}

#[tokio::test]
async fn test_small_recipe_quantities_are_debited() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let err = recipe::replace(
        &f.pool,
        f.muffin,
        "Muffin",
        &[RecipeIngredientInput { inventory_item_id: f.milk, quantity: 0.0004 }],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Invalid(ErrorCode::RecipeInvalid, _)));

    let saved = recipe::replace(
        &f.pool,
        f.muffin,
        "Muffin",
        &[RecipeIngredientInput { inventory_item_id: f.milk, quantity: 0.0014 }],
    )
    .await
    .unwrap();
    assert_eq!(saved.ingredients[0].quantity, 0.001);

    for _ in 0..5 {
        engine
            .create_order(f.cashier.id, card_order(vec![line(f.muffin, 1)]))
            .await
            .unwrap();
    }
    assert_eq!(stock_of(&f.pool, f.milk).await, 9.995);
}

#[tokio::test]
async fn test_stock_check_and_debit_agree_on_rounding() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    // unrounded recipe row: 2 x 0.0007 = 0.0014, debited as 0.001
    sqlx::query(
        "INSERT INTO product_recipes (product_id, name, created_at, updated_at) VALUES (?, 'Muffin', 0, 0)",
    )
    .bind(f.muffin)
    .execute(&f.pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO recipe_ingredients (product_id, position, inventory_item_id, quantity) VALUES (?, 0, ?, 0.0007)",
    )
    .bind(f.muffin)
    .bind(f.milk)
    .execute(&f.pool)
    .await
    .unwrap();
    sqlx::query("UPDATE inventory_items SET current_stock_level = 0.001 WHERE id = ?")
        .bind(f.milk)
        .execute(&f.pool)
        .await
        .unwrap();

    engine
        .create_order(f.cashier.id, card_order(vec![line(f.muffin, 2)]))
        .await
        .unwrap();
    assert_eq!(stock_of(&f.pool, f.milk).await, 0.0);

    let err = engine
        .create_order(f.cashier.id, card_order(vec![line(f.muffin, 2)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InsufficientStock { ref ingredient, required, available, .. }
            if ingredient == "Milk" && required == 0.001 && available == 0.0
    ));
}

#[tokio::test]
async fn test_catalog_errors() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let err = engine
        .create_order(f.cashier.id, card_order(vec![line(f.latte, 1), line(999, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ProductNotFound(999)));

    let err = engine
        .create_order(f.cashier.id, card_order(vec![line(f.tart, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::ProductUnavailable { product_id, .. } if product_id == f.tart
    ));

    assert_eq!(count_rows(&f.pool, "orders").await, 0);
    assert_eq!(stock_of(&f.pool, f.milk).await, 10.0);
}

#[tokio::test]
async fn test_request_validation() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let err = engine
        .create_order(f.cashier.id, card_order(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyOrder));

    let err = engine
        .create_order(f.cashier.id, card_order(vec![line(f.latte, 0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidQuantity { quantity: 0, .. }));

    let mut bitcoin = card_order(vec![line(f.latte, 1)]);
    bitcoin.payment_method = "bitcoin".into();
    let err = engine.create_order(f.cashier.id, bitcoin).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidPaymentMethod(_)));

    let mut no_cash = cash_order(vec![line(f.latte, 1)], 0.0);
    no_cash.cash_received = None;
    let err = engine.create_order(f.cashier.id, no_cash).await.unwrap_err();
    assert!(matches!(err, OrderError::MissingCashReceived));

    let err = engine
        .create_order(9999, card_order(vec![line(f.latte, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::CreatorNotFound(9999)));

    assert_eq!(count_rows(&f.pool, "orders").await, 0);
}

#[tokio::test]
async fn test_card_order_ignores_cash_received() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let mut input = card_order(vec![line(f.muffin, 1)]);
    input.cash_received = Some(100.0);
    let order = engine.create_order(f.cashier.id, input).await.unwrap();

    assert_eq!(order.order.cash_received, None);
    assert_eq!(order.change, None);
}

#[tokio::test]
async fn test_status_update_is_audited_without_restock() {
    let f = setup().await;
    let (engine, audit, mut rx) = engine(&f.pool);

    let order = engine
        .create_order(f.cashier.id, card_order(vec![line(f.latte, 3)]))
        .await
        .unwrap();
    assert_eq!(stock_of(&f.pool, f.milk).await, 7.0);

    let cancelled = engine
        .update_status(f.manager.id, order.order.id, "cancelled")
        .await
        .unwrap();
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&f.pool, f.milk).await, 7.0);

    // Transitions are not guarded
    let reopened = engine
        .update_status(f.manager.id, order.order.id, "pending")
        .await
        .unwrap();
    assert_eq!(reopened.order.status, OrderStatus::Pending);

    let err = engine
        .update_status(f.manager.id, order.order.id, "refunded")
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidStatus(_)));

    let err = engine
        .update_status(f.manager.id, 4242, "completed")
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(4242)));

    // create + two status changes
    assert_eq!(drain_audit(&f.pool, &mut rx).await, 3);

    let (logs, pagination) = audit
        .query(&pos_server::audit::AuditQuery {
            category: Some(LogCategory::Order),
            user_id: Some(f.manager.id),
            page: 1,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pagination.total, 2);
    assert_eq!(logs[0].details["old_status"], "cancelled");
    assert_eq!(logs[0].details["new_status"], "pending");
    assert_eq!(logs[1].details["old_status"], "completed");
    assert_eq!(logs[1].details["new_status"], "cancelled");
}

#[tokio::test]
async fn test_list_paged_and_delete() {
    let f = setup().await;
    let (engine, _audit, _rx) = engine(&f.pool);

    let mut ids = Vec::new();
    for _ in 0..3 {
        let order = engine
            .create_order(f.cashier.id, card_order(vec![line(f.muffin, 1)]))
            .await
            .unwrap();
        ids.push(order.order.id);
    }

    let page = pos_server::search::PageRequest::new(1, 2).unwrap();
    let (orders, pagination) = engine.list_paged(page).await.unwrap();
    assert_eq!(pagination.total, 3);
    assert_eq!(pagination.pages, 2);
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.items.is_empty()));
    // newest first
    assert_eq!(orders[0].id, ids[2]);
    assert_eq!(orders[1].id, ids[1]);

    engine.delete_order(f.admin.id, ids[0]).await.unwrap();
    assert_eq!(count_rows(&f.pool, "orders").await, 2);
    assert_eq!(count_rows(&f.pool, "order_items").await, 2);
    assert!(matches!(
        engine.delete_order(f.admin.id, ids[0]).await,
        Err(OrderError::OrderNotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_never_overdraw() {
    let dir = tempfile::tempdir().unwrap();
    let f = setup_file(&dir, 5).await;
    let (engine, _audit, _rx) = engine(&f.pool);

    // 8 orders × 2 milk against 10 milk: exactly 5 fit
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let user_id = f.cashier.id;
            let latte = f.latte;
            tokio::spawn(async move {
                engine
                    .create_order(user_id, card_order(vec![line(latte, 2)]))
                    .await
            })
        })
        .collect();

    let results: Vec<_> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let short = results
        .iter()
        .filter(|r| matches!(r, Err(OrderError::InsufficientStock { .. })))
        .count();

    assert_eq!(succeeded, 5);
    assert_eq!(short, 3);
    assert_eq!(stock_of(&f.pool, f.milk).await, 0.0);
    assert_eq!(count_rows(&f.pool, "orders").await, 5);
    assert_eq!(count_rows(&f.pool, "order_items").await, 5);
}
