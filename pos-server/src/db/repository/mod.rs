//! Repository Module
//!
//! Free-function CRUD over the SQLite pool. Functions that must take part in a
//! caller's transaction accept `&mut SqliteConnection` instead of the pool.

// Catalog
pub mod product;
pub mod recipe;

// Inventory
pub mod inventory;

// Orders
pub mod order;

// Staff & system
pub mod system_log;
pub mod user;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Rejected field value with its domain error code
    #[error("Invalid value: {1}")]
    Invalid(ErrorCode, String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Invalid(code, msg) => AppError::with_message(code, msg),
            // 不向调用方暴露存储细节
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Storage failure");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
