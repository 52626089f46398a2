//! Order search errors

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid page: {0}. Page must be a positive integer")]
    InvalidPage(String),

    #[error("Invalid page size: {0}. Must be between 1 and {max}", max = super::criteria::MAX_PAGE_SIZE)]
    InvalidPageSize(String),

    #[error("Invalid {field}: {value}. Use YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid {field}: {value}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("Minimum amount {min} is greater than maximum amount {max}")]
    InvalidAmountRange { min: f64, max: f64 },

    #[error("Invalid {field}: {value}")]
    InvalidFilter { field: &'static str, value: String },

    #[error("Order query failed: {0}")]
    Query(#[from] RepoError),
}

impl From<sqlx::Error> for SearchError {
    fn from(err: sqlx::Error) -> Self {
        SearchError::Query(err.into())
    }
}

impl SearchError {
    /// Caller input problem (as opposed to a storage failure)
    pub fn is_validation(&self) -> bool {
        !matches!(self, SearchError::Query(_))
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        let message = err.to_string();
        match err {
            SearchError::InvalidPage(value) => {
                AppError::with_message(ErrorCode::InvalidPage, message).with_detail("page", value)
            }
            SearchError::InvalidPageSize(value) => {
                AppError::with_message(ErrorCode::InvalidPageSize, message)
                    .with_detail("limit", value)
            }
            SearchError::InvalidDate { field, value } => {
                AppError::with_message(ErrorCode::InvalidDate, message)
                    .with_detail("field", field)
                    .with_detail("value", value)
            }
            SearchError::InvalidDateRange { start, end } => {
                AppError::with_message(ErrorCode::InvalidDateRange, message)
                    .with_detail("startDate", start)
                    .with_detail("endDate", end)
            }
            SearchError::InvalidAmount { field, value } => {
                AppError::with_message(ErrorCode::InvalidAmount, message)
                    .with_detail("field", field)
                    .with_detail("value", value)
            }
            SearchError::InvalidAmountRange { min, max } => {
                AppError::with_message(ErrorCode::InvalidAmountRange, message)
                    .with_detail("minAmount", min)
                    .with_detail("maxAmount", max)
            }
            SearchError::InvalidFilter { field, value } => {
                AppError::with_message(ErrorCode::InvalidSearchFilter, message)
                    .with_detail("field", field)
                    .with_detail("value", value)
            }
            SearchError::Query(e) => e.into(),
        }
    }
}
