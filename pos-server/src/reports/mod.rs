//! Reporting Aggregator
//!
//! Read-only aggregates over orders, catalog and inventory. Calendar days
//! are cut in the business timezone.
//!
//! - [`sales`] - daily / range sales, best sellers
//! - [`catalog`] - inventory valuation, category mix
//! - [`activity`] - per-user sales activity

pub mod activity;
pub mod catalog;
pub mod sales;

use chrono_tz::Tz;
use sqlx::SqlitePool;

pub use sales::DEFAULT_BEST_SELLING_LIMIT;

/// Report service
#[derive(Clone)]
pub struct ReportService {
    pool: SqlitePool,
    tz: Tz,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService").field("tz", &self.tz).finish_non_exhaustive()
    }
}

impl ReportService {
    pub fn new(pool: SqlitePool, tz: Tz) -> Self {
        Self { pool, tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}
