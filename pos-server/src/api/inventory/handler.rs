//! Inventory API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use shared::models::{InventoryItem, LogCategory, StockAdjustment};

use crate::auth::{CurrentUser, require_manager};
use crate::core::ServerState;
use crate::db::repository::inventory::{self, StockChange};
use crate::db::repository::RepoError;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<InventoryItem>>>> {
    require_manager(&user)?;
    let items = inventory::find_all(&state.pool).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Items strictly below their minimum level
pub async fn low_stock(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<InventoryItem>>>> {
    require_manager(&user)?;
    let items = inventory::find_low_stock(&state.pool).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Restock or correct down; never below zero
pub async fn adjust_stock(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjustment>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    require_manager(&user)?;

    let change = inventory::adjust_stock(&state.pool, id, payload.delta)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::with_message(
                ErrorCode::InventoryItemNotFound,
                format!("Inventory item {id} not found"),
            )
            .with_detail("ingredient_id", id),
            other => other.into(),
        })?;

    match change {
        StockChange::Applied { level } => {
            tracing::info!(ingredient_id = id, delta = payload.delta, level, "Stock adjusted");
            state.audit.info(
                LogCategory::Inventory,
                format!("Stock of item #{id} adjusted by {}", payload.delta),
                json!({ "ingredient_id": id, "delta": payload.delta, "level": level }),
                Some(user.id),
            );
        }
        StockChange::Insufficient { name, available } => {
            return Err(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!("Insufficient stock for {name}"),
            )
            .with_detail("ingredient_id", id)
            .with_detail("ingredient", name)
            .with_detail("required", -payload.delta)
            .with_detail("available", available));
        }
    }

    let item = inventory::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inventory item {id}")))?;
    Ok(Json(ApiResponse::success(item)))
}
