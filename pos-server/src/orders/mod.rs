//! Order fulfillment
//!
//! - [`OrderEngine`] - atomic order creation, status changes and reads
//! - [`OrderError`] - typed validation / business / storage failures
//! - [`money`] - Decimal pricing helpers
//! - [`requirements`] - recipe expansion into per-ingredient demand

pub mod engine;
pub mod error;
pub mod money;
pub mod requirements;

pub use engine::OrderEngine;
pub use error::{OrderError, OrderResult};
pub use requirements::{Requirement, Requirements};
