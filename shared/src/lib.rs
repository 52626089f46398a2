//! Shared types for the coffee-shop POS
//!
//! Data models, the unified error system and the pagination envelope used by
//! `pos-server` and its API clients.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use pagination::Pagination;
