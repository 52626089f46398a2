//! 审计日志后台 Worker
//!
//! 从 mpsc 通道消费 AuditLogRequest，写入 system_logs。
//! 通道关闭时自动退出。

use sqlx::SqlitePool;

use super::service::AuditLogRequest;
use crate::db::repository::system_log;

/// 审计日志后台 Worker
pub struct AuditWorker {
    pool: SqlitePool,
}

impl AuditWorker {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 运行 worker（直到通道关闭）
    pub async fn run(self, mut rx: tokio::sync::mpsc::Receiver<AuditLogRequest>) {
        tracing::info!("Audit log worker started");

        while let Some(req) = rx.recv().await {
            self.write(req).await;
        }

        tracing::info!("Audit log channel closed, worker stopping");
    }

    /// 写入一条日志，失败只记录不传播
    pub async fn write(&self, req: AuditLogRequest) {
        match system_log::insert(
            &self.pool,
            req.level,
            req.category,
            &req.message,
            &req.details,
            req.user_id,
            req.created_at,
        )
        .await
        {
            Ok(id) => {
                tracing::debug!(
                    log_id = id,
                    category = req.category.as_str(),
                    "Audit entry recorded"
                );
            }
            Err(e) => {
                tracing::error!("Failed to write audit entry: {:?}", e);
            }
        }
    }
}
