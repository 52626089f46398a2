//! Order search (advanced search)
//!
//! ```text
//! OrderSearchParams (raw strings)
//!     │ OrderSearchCriteria::parse   validation, business-timezone day bounds
//!     ▼
//! OrderSearchCriteria ──▶ OrderQuery (typed predicates)
//!                              ├─ count_sql  COUNT(DISTINCT o.id)
//!                              └─ page_sql   DISTINCT rows, LIMIT/OFFSET
//! ```

pub mod criteria;
pub mod error;
pub mod predicate;

pub use criteria::{OrderSearchCriteria, OrderSearchParams, PageRequest};
pub use error::SearchError;
pub use predicate::{Column, Op, OrderQuery, Predicate, QueryValue};

use std::sync::Arc;

use chrono_tz::Tz;
use serde::Serialize;
use serde_json::json;
use shared::Pagination;
use shared::models::{LogCategory, Order};
use sqlx::SqlitePool;

use crate::audit::AuditService;

/// Search response body
#[derive(Debug, Clone, Serialize)]
pub struct OrderSearchResult {
    /// Headers only, `items` is left empty
    pub orders: Vec<Order>,
    pub total: i64,
    pub pagination: Pagination,
}

/// Order search service
#[derive(Clone)]
pub struct OrderSearch {
    pool: SqlitePool,
    tz: Tz,
    audit: Option<Arc<AuditService>>,
}

impl std::fmt::Debug for OrderSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSearch").field("tz", &self.tz).finish_non_exhaustive()
    }
}

impl OrderSearch {
    pub fn new(pool: SqlitePool, tz: Tz) -> Self {
        Self {
            pool,
            tz,
            audit: None,
        }
    }

    /// Record storage failures in the system log
    pub fn with_audit(mut self, audit: Arc<AuditService>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate raw parameters then run the search
    pub async fn search(&self, params: &OrderSearchParams) -> Result<OrderSearchResult, SearchError> {
        self.search_by(None, params).await
    }

    /// [`search`](Self::search) on behalf of `user_id`, who is named in the
    /// failure log entry
    pub async fn search_by(
        &self,
        user_id: Option<i64>,
        params: &OrderSearchParams,
    ) -> Result<OrderSearchResult, SearchError> {
        let (criteria, page) = OrderSearchCriteria::parse(params, self.tz)?;
        match self.run(&criteria, page).await {
            Err(e @ SearchError::Query(_)) => {
                tracing::error!(user_id, error = %e, "Order search failed");
                if let Some(audit) = &self.audit {
                    audit.error(
                        LogCategory::Order,
                        "Order search failed",
                        json!({
                            "error": e.to_string(),
                            "filters": criteria.filter_count(),
                            "page": page.page(),
                        }),
                        user_id,
                    );
                }
                Err(e)
            }
            result => result,
        }
    }

    /// Count and page with identical predicates
    pub async fn run(
        &self,
        criteria: &OrderSearchCriteria,
        page: PageRequest,
    ) -> Result<OrderSearchResult, SearchError> {
        let query = OrderQuery::from_criteria(criteria);

        let count_sql = query.count_sql();
        let total = query
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql))
            .fetch_one(&self.pool)
            .await?;

        let page_sql = query.page_sql();
        let orders = query
            .bind_as(sqlx::query_as::<_, Order>(&page_sql))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            filters = criteria.filter_count(),
            joins_items = query.joins_items(),
            total,
            page = page.page(),
            "Order search"
        );

        Ok(OrderSearchResult {
            orders,
            total,
            pagination: page.pagination(total),
        })
    }
}
