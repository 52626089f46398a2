//! System Log Model (append-only audit trail)

use serde::{Deserialize, Serialize};

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Subsystem that produced the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LogCategory {
    Auth,
    Order,
    Inventory,
    Product,
    System,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Order => "order",
            Self::Inventory => "inventory",
            Self::Product => "product",
            Self::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auth" => Some(Self::Auth),
            "order" => Some(Self::Order),
            "inventory" => Some(Self::Inventory),
            "product" => Some(Self::Product),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Persisted log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SystemLog {
    pub id: i64,
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
    /// JSON object (flexible schema)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub details: serde_json::Value,
    /// Acting user, `None` for system-originated entries
    pub user_id: Option<i64>,
    pub created_at: i64,
}
