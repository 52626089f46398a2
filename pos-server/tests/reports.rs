//! Reporting integration tests

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use common::*;
use pos_server::reports::{DEFAULT_BEST_SELLING_LIMIT, ReportService};
use shared::models::{OrderStatus, PaymentMethod};

fn at(d: u32, h: u32) -> i64 {
    Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0)
        .single()
        .expect("valid timestamp")
        .timestamp_millis()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
}

async fn seed_sales(f: &Fixture) {
    let c = f.cashier.id;
    let m = f.manager.id;
    insert_order(&f.pool, c, PaymentMethod::Cash, OrderStatus::Completed, at(5, 9), &[(f.latte, 2, 3.5)]).await;
    insert_order(&f.pool, c, PaymentMethod::Card, OrderStatus::Completed, at(5, 10), &[(f.latte, 1, 3.5), (f.muffin, 2, 2.5)]).await;
    insert_order(&f.pool, m, PaymentMethod::Card, OrderStatus::Cancelled, at(5, 11), &[(f.drip, 5, 3.0)]).await;
    insert_order(&f.pool, c, PaymentMethod::Cash, OrderStatus::Completed, at(6, 8), &[(f.drip, 1, 3.0)]).await;
    insert_order(&f.pool, m, PaymentMethod::Card, OrderStatus::Completed, at(8, 8), &[(f.muffin, 1, 2.5)]).await;
}

#[tokio::test]
async fn test_daily_sales_by_payment_method() {
    let f = setup().await;
    seed_sales(&f).await;
    let reports = ReportService::new(f.pool.clone(), Tz::UTC);

    let rows = reports.daily_sales(day(5)).await.unwrap();
    assert_eq!(rows.len(), 2);

    let card = rows.iter().find(|r| r.payment_method == "card").unwrap();
    assert_eq!(card.order_count, 2);
    assert_eq!(card.total_sales, 23.5);
    assert_eq!(card.completed_orders, 1);
    assert_eq!(card.cancelled_orders, 1);

    let cash = rows.iter().find(|r| r.payment_method == "cash").unwrap();
    assert_eq!(cash.order_count, 1);
    assert_eq!(cash.total_sales, 7.0);

    assert!(reports.daily_sales(day(7)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sales_by_range_buckets_days() {
    let f = setup().await;
    seed_sales(&f).await;
    let reports = ReportService::new(f.pool.clone(), Tz::UTC);

    let rows = reports.sales_by_range(day(5), day(8)).await.unwrap();
    let dates: Vec<_> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-01-06", "2024-01-08"]);
    assert_eq!(rows[0].order_count, 3);
    assert_eq!(rows[0].total_sales, 30.5);
    assert_eq!(rows[1].total_sales, 3.0);

    let rows = reports.sales_by_range(day(6), day(6)).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_best_selling_ignores_cancelled_orders() {
    let f = setup().await;
    seed_sales(&f).await;
    let reports = ReportService::new(f.pool.clone(), Tz::UTC);

    let rows = reports
        .best_selling(DEFAULT_BEST_SELLING_LIMIT, None)
        .await
        .unwrap();
    // latte 3, muffin 3, drip 1 (the cancelled 5 drips are ignored)
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].total_quantity, 3);
    assert_eq!(rows[2].product_id, f.drip);
    assert_eq!(rows[2].total_quantity, 1);
    let latte = rows.iter().find(|r| r.product_id == f.latte).unwrap();
    assert_eq!(latte.name, "Latte");
    assert_eq!(latte.total_sales, 10.5);

    let rows = reports.best_selling(1, Some((day(6), day(8)))).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_id, f.drip);
}

#[tokio::test]
async fn test_inventory_value_and_category_mix() {
    let f = setup().await;
    let reports = ReportService::new(f.pool.clone(), Tz::UTC);

    let report = reports.inventory_value().await.unwrap();
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].name, "Espresso Beans");
    assert_eq!(report.items[0].total_value, 30.0);
    assert_eq!(report.items[1].total_value, 12.0);
    assert_eq!(report.summary.total_value, 42.0);
    assert_eq!(report.summary.low_stock_count, 0);

    let mix = reports.category_mix().await.unwrap();
    assert_eq!(mix.len(), 2);
    assert_eq!(mix[0].category, "coffee");
    assert_eq!(mix[0].product_count, 3);
    assert_eq!(mix[0].average_price, 3.5);
    assert_eq!(mix[1].category, "pastry");
    assert_eq!(mix[1].available_count, 1);
    assert_eq!(mix[1].unavailable_count, 1);
}

#[tokio::test]
async fn test_user_activity_includes_idle_users() {
    let f = setup().await;
    seed_sales(&f).await;
    let reports = ReportService::new(f.pool.clone(), Tz::UTC);

    let rows = reports.user_activity().await.unwrap();
    assert_eq!(rows.len(), 3);

    let cashier = rows.iter().find(|r| r.user_id == f.cashier.id).unwrap();
    assert_eq!(cashier.orders_count, 3);
    assert_eq!(cashier.total_sales, 18.5);
    assert_eq!(cashier.last_active, Some(at(6, 8)));

    let admin = rows.iter().find(|r| r.user_id == f.admin.id).unwrap();
    assert_eq!(admin.orders_count, 0);
    assert_eq!(admin.total_sales, 0.0);
    assert_eq!(admin.last_active, None);
}
