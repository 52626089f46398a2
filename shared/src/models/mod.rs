//! Data models
//!
//! Shared between pos-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod inventory;
pub mod order;
pub mod product;
pub mod report;
pub mod system_log;
pub mod user;

// Re-exports
pub use inventory::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use system_log::*;
pub use user::*;
