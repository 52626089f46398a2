//! Order Engine errors
//!
//! Validation and business-rule variants carry enough detail for the caller
//! to fix the cart; storage failures stay opaque.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: i64, quantity: i64 },

    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    #[error("Cash received is required for cash payments")]
    MissingCashReceived,

    #[error("Invalid cash received amount: {0}")]
    InvalidCashReceived(f64),

    #[error("Insufficient payment: total {total}, received {received}")]
    InsufficientPayment { total: f64, received: f64 },

    #[error("User {0} not found")]
    CreatorNotFound(i64),

    #[error("Product {0} not found")]
    ProductNotFound(i64),

    #[error("Product '{name}' is not available")]
    ProductUnavailable { product_id: i64, name: String },

    #[error("Inventory item {0} not found")]
    IngredientNotFound(i64),

    #[error("Insufficient stock for {ingredient}: required {required}, available {available}")]
    InsufficientStock {
        ingredient_id: i64,
        ingredient: String,
        required: f64,
        available: f64,
    },

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error(transparent)]
    Storage(#[from] RepoError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Storage(err.into())
    }
}

impl OrderError {
    /// Storage failures, as opposed to expected validation / business outcomes
    pub fn is_storage(&self) -> bool {
        matches!(self, OrderError::Storage(_))
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::EmptyOrder => AppError::with_message(ErrorCode::OrderEmpty, message),
            OrderError::InvalidQuantity {
                product_id,
                quantity,
            } => AppError::with_message(ErrorCode::InvalidQuantity, message)
                .with_detail("product_id", product_id)
                .with_detail("quantity", quantity),
            OrderError::InvalidPaymentMethod(method) => {
                AppError::with_message(ErrorCode::PaymentInvalidMethod, message)
                    .with_detail("payment_method", method)
            }
            OrderError::MissingCashReceived => {
                AppError::with_message(ErrorCode::CashReceivedRequired, message)
            }
            OrderError::InvalidCashReceived(cash) => {
                AppError::with_message(ErrorCode::ValueOutOfRange, message)
                    .with_detail("cash_received", cash)
            }
            OrderError::InsufficientPayment { total, received } => {
                AppError::with_message(ErrorCode::PaymentInsufficientAmount, message)
                    .with_detail("total", total)
                    .with_detail("cash_received", received)
            }
            OrderError::CreatorNotFound(user_id) => {
                AppError::with_message(ErrorCode::NotFound, message).with_detail("user_id", user_id)
            }
            OrderError::ProductNotFound(product_id) => {
                AppError::with_message(ErrorCode::ProductNotFound, message)
                    .with_detail("product_id", product_id)
            }
            OrderError::ProductUnavailable { product_id, name } => {
                AppError::with_message(ErrorCode::ProductUnavailable, message)
                    .with_detail("product_id", product_id)
                    .with_detail("product", name)
            }
            OrderError::IngredientNotFound(ingredient_id) => {
                AppError::with_message(ErrorCode::InventoryItemNotFound, message)
                    .with_detail("ingredient_id", ingredient_id)
            }
            OrderError::InsufficientStock {
                ingredient_id,
                ingredient,
                required,
                available,
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("ingredient_id", ingredient_id)
                .with_detail("ingredient", ingredient)
                .with_detail("required", required)
                .with_detail("available", available),
            OrderError::OrderNotFound(order_id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message)
                    .with_detail("order_id", order_id)
            }
            OrderError::InvalidStatus(status) => {
                AppError::with_message(ErrorCode::InvalidOrderStatus, message)
                    .with_detail("status", status)
            }
            OrderError::Storage(e) => e.into(),
        }
    }
}
