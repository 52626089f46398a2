//! Report API Module
//!
//! 所有报表按业务时区切分日期。`user-activity` 仅管理员可见，其余需要店长权限。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/daily/{date}", get(handler::daily))
        .route("/range/{start}/{end}", get(handler::range))
        .route("/best-selling", get(handler::best_selling))
        .route("/inventory-value", get(handler::inventory_value))
        .route("/product-categories", get(handler::product_categories))
        .route("/user-activity", get(handler::user_activity))
}
