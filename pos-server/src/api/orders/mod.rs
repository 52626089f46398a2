//! Order API Module
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/orders | POST | 已登录 |
//! | /api/orders | GET | 店长 / 管理员 |
//! | /api/orders/search | GET | 店长 / 管理员 |
//! | /api/orders/{id} | GET | 已登录 (收银员仅限本人订单) |
//! | /api/orders/{id}/status | PATCH | 店长 / 管理员 |
//! | /api/orders/{id} | DELETE | 管理员 |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // 静态路径优先于 /{id}
        .route("/search", get(handler::search))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/status", patch(handler::update_status))
}
