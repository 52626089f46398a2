//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Product, Recipe};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{product, recipe};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => product::find_by_category(&state.pool, category).await?,
        None => product::find_all(&state.pool).await?,
    };
    Ok(Json(ApiResponse::success(products)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(Json(ApiResponse::success(product)))
}

/// Recipe with ingredient names and units, in recipe order
pub async fn get_recipe(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    if product::find_by_id(&state.pool, id).await?.is_none() {
        return Err(product_not_found(id));
    }
    let recipe = recipe::find_by_product(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Recipe for product {id}")))?;
    Ok(Json(ApiResponse::success(recipe)))
}

fn product_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("product_id", id)
}
