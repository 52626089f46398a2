//! Catalog and inventory reports

use rust_decimal::Decimal;
use shared::models::{CategoryMix, InventoryValueLine, InventoryValueReport, InventoryValueSummary};

use super::ReportService;
use crate::db::repository::{RepoResult, inventory};
use crate::orders::money::{to_decimal, to_money};

impl ReportService {
    /// Stock value of every costed item, highest value first
    ///
    /// Items without a positive cost per unit are left out.
    pub async fn inventory_value(&self) -> RepoResult<InventoryValueReport> {
        let items = inventory::find_all(&self.pool).await?;

        let mut total = Decimal::ZERO;
        let mut lines: Vec<(Decimal, InventoryValueLine)> = items
            .into_iter()
            .filter_map(|item| {
                let cost = item.cost_per_unit.filter(|c| *c > 0.0)?;
                let value = to_decimal(item.current_stock_level) * to_decimal(cost);
                let is_low_stock = item.is_low_stock();
                Some((
                    value,
                    InventoryValueLine {
                        id: item.id,
                        name: item.name,
                        current_stock_level: item.current_stock_level,
                        unit: item.unit,
                        cost_per_unit: cost,
                        total_value: to_money(value),
                        is_low_stock,
                    },
                ))
            })
            .collect();

        lines.sort_by(|a, b| b.0.cmp(&a.0));
        for (value, _) in &lines {
            total += *value;
        }

        let low_stock_count = lines.iter().filter(|(_, l)| l.is_low_stock).count();
        let items: Vec<InventoryValueLine> = lines.into_iter().map(|(_, l)| l).collect();

        Ok(InventoryValueReport {
            summary: InventoryValueSummary {
                total_value: to_money(total),
                item_count: items.len(),
                low_stock_count,
            },
            items,
        })
    }

    /// Product counts and average price per category
    pub async fn category_mix(&self) -> RepoResult<Vec<CategoryMix>> {
        let rows = sqlx::query_as::<_, CategoryMix>(
            "SELECT category, COUNT(*) AS product_count, SUM(CASE WHEN is_available THEN 1 ELSE 0 END) AS available_count, SUM(CASE WHEN is_available THEN 0 ELSE 1 END) AS unavailable_count, ROUND(AVG(price), 2) AS average_price FROM products GROUP BY category ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
