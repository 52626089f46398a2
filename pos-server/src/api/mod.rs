//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 下单、订单查询与搜索
//! - [`reports`] - 销售 / 库存 / 员工报表
//! - [`inventory`] - 原料库存
//! - [`products`] - 商品与配方
//! - [`logs`] - 审计日志

pub mod health;
pub mod inventory;
pub mod logs;
pub mod orders;
pub mod products;
pub mod reports;

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// 组装所有路由和中间件
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(reports::router())
        .merge(inventory::router())
        .merge(products::router())
        .merge(logs::router())
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
