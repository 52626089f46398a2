//! Inventory API Module
//!
//! 列表与低库存查询需要店长权限；库存调整同样需要店长权限并记入审计日志。

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/low-stock", get(handler::low_stock))
        .route("/{id}/stock", patch(handler::adjust_stock))
}
