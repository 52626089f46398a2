//! Unified error codes for the POS server
//!
//! Every error that crosses the HTTP boundary carries one of these codes.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order and order search errors
//! - 5xxx: Payment errors
//! - 6xxx: Product / recipe errors
//! - 7xxx: Inventory errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that clients can match on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Manager or admin role required
    ManagerRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Line quantity is not a positive integer within limits
    InvalidQuantity = 4003,
    /// Order status is not one of pending / completed / cancelled
    InvalidOrderStatus = 4004,

    // Order search (41xx)
    /// Page number must be >= 1
    InvalidPage = 4101,
    /// Page size must be within 1..=100
    InvalidPageSize = 4102,
    /// Date could not be parsed
    InvalidDate = 4103,
    /// Start date is after end date
    InvalidDateRange = 4104,
    /// Amount could not be parsed
    InvalidAmount = 4105,
    /// Minimum amount is greater than maximum amount
    InvalidAmountRange = 4106,
    /// A search filter value could not be parsed
    InvalidSearchFilter = 4107,

    // ==================== 5xxx: Payment ====================
    /// Payment method is not cash or card
    PaymentInvalidMethod = 5001,
    /// Cash received is less than the order total
    PaymentInsufficientAmount = 5002,
    /// Cash order submitted without cash received
    CashReceivedRequired = 5003,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is not available for sale
    ProductUnavailable = 6002,
    /// Product price must be positive
    ProductInvalidPrice = 6003,
    /// Recipe entry is invalid
    RecipeInvalid = 6101,

    // ==================== 7xxx: Inventory ====================
    /// Inventory item not found
    InventoryItemNotFound = 7001,
    /// Not enough stock for the requested quantity
    InsufficientStock = 7002,
    /// Inventory item name already exists
    InventoryNameExists = 7003,
    /// Stock level must not be negative
    InvalidStockLevel = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Operation timed out
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid token",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ManagerRequired => "Manager or admin role required",
            ErrorCode::AdminRequired => "Admin role required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidQuantity => "Invalid item quantity",
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::InvalidPage => "Page must be at least 1",
            ErrorCode::InvalidPageSize => "Page size must be between 1 and 100",
            ErrorCode::InvalidDate => "Invalid date",
            ErrorCode::InvalidDateRange => "Start date must not be after end date",
            ErrorCode::InvalidAmount => "Invalid amount",
            ErrorCode::InvalidAmountRange => "Minimum amount must not exceed maximum amount",
            ErrorCode::InvalidSearchFilter => "Invalid search filter",

            // Payment
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentInsufficientAmount => "Insufficient payment amount",
            ErrorCode::CashReceivedRequired => "Cash received is required for cash payments",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductUnavailable => "Product is not available",
            ErrorCode::ProductInvalidPrice => "Product price must be positive",
            ErrorCode::RecipeInvalid => "Invalid recipe",

            // Inventory
            ErrorCode::InventoryItemNotFound => "Inventory item not found",
            ErrorCode::InsufficientStock => "Insufficient stock",
            ErrorCode::InventoryNameExists => "Inventory item name already exists",
            ErrorCode::InvalidStockLevel => "Stock level must not be negative",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::ManagerRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidQuantity),
            4004 => Ok(ErrorCode::InvalidOrderStatus),
            4101 => Ok(ErrorCode::InvalidPage),
            4102 => Ok(ErrorCode::InvalidPageSize),
            4103 => Ok(ErrorCode::InvalidDate),
            4104 => Ok(ErrorCode::InvalidDateRange),
            4105 => Ok(ErrorCode::InvalidAmount),
            4106 => Ok(ErrorCode::InvalidAmountRange),
            4107 => Ok(ErrorCode::InvalidSearchFilter),

            // Payment
            5001 => Ok(ErrorCode::PaymentInvalidMethod),
            5002 => Ok(ErrorCode::PaymentInsufficientAmount),
            5003 => Ok(ErrorCode::CashReceivedRequired),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductUnavailable),
            6003 => Ok(ErrorCode::ProductInvalidPrice),
            6101 => Ok(ErrorCode::RecipeInvalid),

            // Inventory
            7001 => Ok(ErrorCode::InventoryItemNotFound),
            7002 => Ok(ErrorCode::InsufficientStock),
            7003 => Ok(ErrorCode::InventoryNameExists),
            7004 => Ok(ErrorCode::InvalidStockLevel),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
