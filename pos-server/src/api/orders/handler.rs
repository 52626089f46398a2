//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::Pagination;
use shared::models::{Order, OrderCreate, OrderDetail, OrderStatusUpdate};

use crate::auth::{CurrentUser, require_admin, require_manager};
use crate::core::ServerState;
use crate::search::{OrderSearchParams, OrderSearchResult, PageRequest};
use crate::utils::{ApiResponse, AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

/// Create an order for the caller
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let order = state.orders.create_order(user.id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Order created",
        order,
    )))
}

/// List orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<OrderListResponse>>> {
    require_manager(&user)?;
    let page = PageRequest::parse(query.page.as_deref(), query.limit.as_deref())?;
    let (orders, pagination) = state.orders.list_paged(page).await?;
    Ok(Json(ApiResponse::success(OrderListResponse {
        orders,
        pagination,
    })))
}

/// Advanced search
pub async fn search(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(params): Query<OrderSearchParams>,
) -> AppResult<Json<ApiResponse<OrderSearchResult>>> {
    require_manager(&user)?;
    let result = state.search.search_by(Some(user.id), &params).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let order = state.orders.get_by_id(id).await?;
    if !user.is_manager_or_admin() && order.order.user_id != user.id {
        crate::security_log!(
            "WARN",
            "order_access_denied",
            user_id = user.id,
            order_id = id
        );
        return Err(AppError::forbidden("Cashiers can only view their own orders"));
    }
    Ok(Json(ApiResponse::success(order)))
}

/// Change order status
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    require_manager(&user)?;
    let order = state
        .orders
        .update_status(user.id, id, &payload.status)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        "Order status updated",
        order,
    )))
}

/// Delete order (admin)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&user)?;
    state.orders.delete_order(user.id, id).await?;
    Ok(Json(ApiResponse::success_with_message("Order deleted", ())))
}
