//! POS Server - 咖啡店收银后台
//!
//! # 架构概述
//!
//! - **订单引擎** (`orders`): 配方展开、库存校验与扣减、原子下单
//! - **订单搜索** (`search`): 动态条件、分页、计数一致
//! - **报表** (`reports`): 销售、库存估值、员工业绩
//! - **审计日志** (`audit`): 异步写入 system_logs
//! - **认证** (`auth`): JWT 令牌验证与角色检查
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池与仓储
//! ├── orders/        # 订单引擎
//! ├── search/        # 订单搜索
//! ├── reports/       # 报表
//! ├── audit/         # 审计日志
//! └── utils/         # 日志、时区工具
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod reports;
pub mod search;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerError, ServerState};
pub use orders::{OrderEngine, OrderError};
pub use search::{OrderSearch, SearchError};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 按配置初始化日志
pub fn setup_environment(config: &Config) {
    utils::logger::init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );
}
