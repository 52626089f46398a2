use std::sync::Arc;

use sqlx::SqlitePool;

use crate::audit::{AuditService, AuditWorker};
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderEngine;
use crate::reports::ReportService;
use crate::search::OrderSearch;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 由进程入口构造一次，注入到 HTTP 层；没有全局连接池或全局密钥。
/// 所有字段都是廉价克隆 (Arc / 连接池句柄)。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | 令牌验证 |
/// | audit | Arc<AuditService> | 审计日志 |
/// | orders | OrderEngine | 下单 / 状态 / 查询 |
/// | search | OrderSearch | 订单高级搜索 |
/// | reports | ReportService | 报表 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 审计日志服务
    pub audit: Arc<AuditService>,
    /// 订单引擎
    pub orders: OrderEngine,
    /// 订单搜索
    pub search: OrderSearch,
    /// 报表服务
    pub reports: ReportService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 打开数据库 (WAL + 迁移)
    /// 2. 构造各服务
    /// 3. 启动审计日志 worker
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path, config.db_max_connections).await?;
        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// 使用现有连接池构造 (测试使用内存库)
    ///
    /// 审计 worker 在当前 tokio 运行时中启动。
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let (audit, rx) = AuditService::new(pool.clone(), config.audit_buffer_size);
        tokio::spawn(AuditWorker::new(pool.clone()).run(rx));

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let tz = config.business_timezone;

        Self {
            orders: OrderEngine::new(pool.clone(), audit.clone()),
            search: OrderSearch::new(pool.clone(), tz).with_audit(audit.clone()),
            reports: ReportService::new(pool.clone(), tz),
            jwt_service,
            audit,
            pool,
            config,
        }
    }
}
