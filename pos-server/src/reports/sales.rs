//! Sales reports

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{DailySales, PaymentMethodSales, ProductSales};

use super::ReportService;
use crate::db::repository::RepoResult;
use crate::orders::money::{to_decimal, to_money};
use crate::utils::time::{day_end_millis, day_start_millis, millis_to_date_string};

pub const DEFAULT_BEST_SELLING_LIMIT: i64 = 5;

impl ReportService {
    /// One business day, grouped by payment method
    pub async fn daily_sales(&self, date: NaiveDate) -> RepoResult<Vec<PaymentMethodSales>> {
        let rows = sqlx::query_as::<_, PaymentMethodSales>(
            "SELECT payment_method, COUNT(*) AS order_count, ROUND(SUM(total_amount), 2) AS total_sales, SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END) AS completed_orders, SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END) AS cancelled_orders FROM orders WHERE created_at >= ? AND created_at < ? GROUP BY payment_method ORDER BY payment_method",
        )
        .bind(day_start_millis(date, self.tz))
        .bind(day_end_millis(date, self.tz))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Per business-local date between `start` and `end` (inclusive)
    ///
    /// Days without orders are omitted.
    pub async fn sales_by_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<DailySales>> {
        let rows = sqlx::query_as::<_, (i64, f64)>(
            "SELECT created_at, total_amount FROM orders WHERE created_at >= ? AND created_at < ? ORDER BY created_at",
        )
        .bind(day_start_millis(start, self.tz))
        .bind(day_end_millis(end, self.tz))
        .fetch_all(&self.pool)
        .await?;

        // SQLite 不懂业务时区，按本地日期在内存中分桶
        let mut days: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
        for (created_at, total) in rows {
            let bucket = days
                .entry(millis_to_date_string(created_at, self.tz))
                .or_insert((0, Decimal::ZERO));
            bucket.0 += 1;
            bucket.1 += to_decimal(total);
        }

        Ok(days
            .into_iter()
            .map(|(date, (order_count, total))| DailySales {
                date,
                order_count,
                total_sales: to_money(total),
            })
            .collect())
    }

    /// Top products of completed orders by quantity, optionally within a date range
    pub async fn best_selling(
        &self,
        limit: i64,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> RepoResult<Vec<ProductSales>> {
        let (from, before) = match range {
            Some((start, end)) => (
                Some(day_start_millis(start, self.tz)),
                Some(day_end_millis(end, self.tz)),
            ),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, ProductSales>(
            "SELECT oi.product_id, IFNULL(p.name, 'Unknown Product') AS name, IFNULL(p.category, '') AS category, SUM(oi.quantity) AS total_quantity, ROUND(SUM(oi.subtotal), 2) AS total_sales FROM order_items oi JOIN orders o ON o.id = oi.order_id LEFT JOIN products p ON p.id = oi.product_id WHERE o.status = 'completed' AND (?1 IS NULL OR o.created_at >= ?1) AND (?2 IS NULL OR o.created_at < ?2) GROUP BY oi.product_id ORDER BY total_quantity DESC, total_sales DESC, oi.product_id LIMIT ?3",
        )
        .bind(from)
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
