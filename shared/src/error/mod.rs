//! Unified error system for the POS server
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order and order search errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 7xxx: Inventory errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::InsufficientStock)
//!     .with_detail("ingredient", "Milk")
//!     .with_detail("required", 12)
//!     .with_detail("available", 10);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(7002));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
