//! Typed predicate builder for order search
//!
//! Criteria become a list of `(column, operator, value)` predicates. Columns
//! and operators are closed enums, values are always bound as `?`
//! placeholders, and the count query and the page query are rendered from
//! the same FROM / WHERE text with the same bindings.

use sqlx::Sqlite;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::sqlite::SqliteArguments;

use super::criteria::OrderSearchCriteria;
use crate::db::repository::order::ORDER_COLUMNS;

/// Searchable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    CreatedAt,
    TotalAmount,
    PaymentMethod,
    Status,
    UserId,
    /// order_items.product_id, requires the item join
    ItemProductId,
}

impl Column {
    pub fn sql(&self) -> &'static str {
        match self {
            Column::CreatedAt => "o.created_at",
            Column::TotalAmount => "o.total_amount",
            Column::PaymentMethod => "o.payment_method",
            Column::Status => "o.status",
            Column::UserId => "o.user_id",
            Column::ItemProductId => "oi.product_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Gte,
    Lte,
    Lt,
}

impl Op {
    pub fn sql(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Lt => "<",
        }
    }
}

/// Bound value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: Column,
    pub op: Op,
    pub value: QueryValue,
}

impl Predicate {
    pub fn new(column: Column, op: Op, value: QueryValue) -> Self {
        Self { column, op, value }
    }

    fn render(&self) -> String {
        format!("{} {} ?", self.column.sql(), self.op.sql())
    }
}

/// Conjunction of predicates over `orders`
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    predicates: Vec<Predicate>,
}

impl OrderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: Column, op: Op, value: QueryValue) -> &mut Self {
        self.predicates.push(Predicate::new(column, op, value));
        self
    }

    /// One predicate per present criterion
    pub fn from_criteria(criteria: &OrderSearchCriteria) -> Self {
        let mut query = Self::new();
        if let Some(from) = criteria.created_from {
            query.push(Column::CreatedAt, Op::Gte, QueryValue::Integer(from));
        }
        if let Some(before) = criteria.created_before {
            query.push(Column::CreatedAt, Op::Lt, QueryValue::Integer(before));
        }
        if let Some(min) = criteria.min_amount {
            query.push(Column::TotalAmount, Op::Gte, QueryValue::Float(min));
        }
        if let Some(max) = criteria.max_amount {
            query.push(Column::TotalAmount, Op::Lte, QueryValue::Float(max));
        }
        if let Some(method) = criteria.payment_method {
            query.push(
                Column::PaymentMethod,
                Op::Eq,
                QueryValue::Text(method.as_str().to_string()),
            );
        }
        if let Some(status) = criteria.status {
            query.push(
                Column::Status,
                Op::Eq,
                QueryValue::Text(status.as_str().to_string()),
            );
        }
        if let Some(user_id) = criteria.user_id {
            query.push(Column::UserId, Op::Eq, QueryValue::Integer(user_id));
        }
        if let Some(product_id) = criteria.product_id {
            query.push(Column::ItemProductId, Op::Eq, QueryValue::Integer(product_id));
        }
        query
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Line items are joined only when a product filter is present
    pub fn joins_items(&self) -> bool {
        self.predicates
            .iter()
            .any(|p| p.column == Column::ItemProductId)
    }

    /// Shared FROM + WHERE text of both queries
    pub fn from_where(&self) -> String {
        let mut sql = String::from("FROM orders o LEFT JOIN users u ON u.id = o.user_id");
        if self.joins_items() {
            sql.push_str(" JOIN order_items oi ON oi.order_id = o.id");
        }
        if !self.predicates.is_empty() {
            let conditions: Vec<String> = self.predicates.iter().map(Predicate::render).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql
    }

    /// Distinct orders matching the predicates
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(DISTINCT o.id) {}", self.from_where())
    }

    /// One page, newest first with id as tie-break; LIMIT / OFFSET bound last
    pub fn page_sql(&self) -> String {
        format!(
            "SELECT DISTINCT {ORDER_COLUMNS} {} ORDER BY o.created_at DESC, o.id DESC LIMIT ? OFFSET ?",
            self.from_where()
        )
    }

    /// Apply predicate bindings to a `query_as`
    pub fn bind_as<'q, O>(
        &self,
        mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
        for predicate in &self.predicates {
            query = match &predicate.value {
                QueryValue::Text(s) => query.bind(s.clone()),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::Float(f) => query.bind(*f),
            };
        }
        query
    }

    /// Apply predicate bindings to a `query_scalar`
    pub fn bind_scalar<'q, O>(
        &self,
        mut query: QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryScalar<'q, Sqlite, O, SqliteArguments<'q>> {
        for predicate in &self.predicates {
            query = match &predicate.value {
                QueryValue::Text(s) => query.bind(s.clone()),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::Float(f) => query.bind(*f),
            };
        }
        query
    }
}
