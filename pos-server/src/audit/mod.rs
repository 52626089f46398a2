//! 审计日志模块: 系统日志追踪
//!
//! # 架构
//!
//! ```text
//! 业务操作触发
//!   └─ AuditService::log() → mpsc → AuditWorker → SQLite (system_logs 表)
//! ```
//!
//! 写入是 fire-and-forget：通道满或已关闭时丢弃该条日志并 `warn!`，
//! 绝不让审计失败影响触发它的业务操作。

pub mod service;
pub mod worker;

pub use service::{AuditLogRequest, AuditQuery, AuditService};
pub use worker::AuditWorker;
