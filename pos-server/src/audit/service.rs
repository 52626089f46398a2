//! 审计日志服务
//!
//! `AuditService` 提供：
//! - 日志写入（通过 mpsc 通道交给 [`AuditWorker`](super::AuditWorker)）
//! - 日志查询（直接读取 SQLite）

use std::sync::Arc;

use shared::models::{LogCategory, LogLevel, SystemLog};
use shared::Pagination;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::db::repository::RepoResult;
use crate::db::repository::system_log::{self, LogFilter};

/// 发送到 AuditWorker 的日志请求
#[derive(Debug, Clone)]
pub struct AuditLogRequest {
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
    pub details: serde_json::Value,
    pub user_id: Option<i64>,
    pub created_at: i64,
}

/// 日志查询条件
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub level: Option<LogLevel>,
    pub category: Option<LogCategory>,
    pub user_id: Option<i64>,
    pub page: u32,
    pub limit: u32,
}

/// 审计日志服务
pub struct AuditService {
    pool: SqlitePool,
    tx: mpsc::Sender<AuditLogRequest>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService")
            .field("capacity", &self.tx.capacity())
            .finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建审计服务，返回的 Receiver 交给 `AuditWorker::run`
    pub fn new(
        pool: SqlitePool,
        buffer_size: usize,
    ) -> (Arc<Self>, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        (Arc::new(Self { pool, tx }), rx)
    }

    /// 记录日志（非阻塞）
    pub fn log(
        &self,
        level: LogLevel,
        category: LogCategory,
        message: impl Into<String>,
        details: serde_json::Value,
        user_id: Option<i64>,
    ) {
        let req = AuditLogRequest {
            level,
            category,
            message: message.into(),
            details,
            user_id,
            created_at: shared::util::now_millis(),
        };

        match self.tx.try_send(req) {
            Ok(()) => {}
            Err(TrySendError::Full(req)) => {
                tracing::warn!(
                    category = req.category.as_str(),
                    message = %req.message,
                    "Audit channel full, entry dropped"
                );
            }
            Err(TrySendError::Closed(req)) => {
                tracing::warn!(
                    category = req.category.as_str(),
                    message = %req.message,
                    "Audit worker stopped, entry dropped"
                );
            }
        }
    }

    pub fn info(
        &self,
        category: LogCategory,
        message: impl Into<String>,
        details: serde_json::Value,
        user_id: Option<i64>,
    ) {
        self.log(LogLevel::Info, category, message, details, user_id);
    }

    pub fn error(
        &self,
        category: LogCategory,
        message: impl Into<String>,
        details: serde_json::Value,
        user_id: Option<i64>,
    ) {
        self.log(LogLevel::Error, category, message, details, user_id);
    }

    /// 查询日志（最新优先）
    pub async fn query(&self, q: &AuditQuery) -> RepoResult<(Vec<SystemLog>, Pagination)> {
        let page = q.page.max(1);
        let limit = q.limit.clamp(1, 100);
        let filter = LogFilter {
            level: q.level,
            category: q.category,
            user_id: q.user_id,
            limit: i64::from(limit),
            offset: i64::from(page - 1) * i64::from(limit),
        };

        let (logs, total) = system_log::query(&self.pool, &filter).await?;
        Ok((logs, Pagination::new(page, limit, total.max(0) as u64)))
    }
}
