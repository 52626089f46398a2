//! Audit Log API Module
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/logs | GET | 管理员 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/logs", get(handler::list))
}
