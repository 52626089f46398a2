//! Report API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{
    CategoryMix, DailySales, InventoryValueReport, PaymentMethodSales, ProductSales,
    UserActivity,
};

use crate::auth::{CurrentUser, require_admin, require_manager};
use crate::core::ServerState;
use crate::reports::DEFAULT_BEST_SELLING_LIMIT;
use crate::utils::time::parse_date;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

const MAX_BEST_SELLING_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSellingQuery {
    pub limit: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn ordered_range(start: NaiveDate, end: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    if start > end {
        return Err(AppError::with_message(
            ErrorCode::InvalidDateRange,
            "Start date must not be after end date",
        )
        .with_detail("start", start.to_string())
        .with_detail("end", end.to_string()));
    }
    Ok((start, end))
}

/// Sales per payment method for one business day
pub async fn daily(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(date): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<PaymentMethodSales>>>> {
    require_manager(&user)?;
    let date = parse_date(&date)?;
    let rows = state.reports.daily_sales(date).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Sales per business day within an inclusive range
pub async fn range(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((start, end)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Vec<DailySales>>>> {
    require_manager(&user)?;
    let (start, end) = ordered_range(parse_date(&start)?, parse_date(&end)?)?;
    let rows = state.reports.sales_by_range(start, end).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Top products by quantity
pub async fn best_selling(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<BestSellingQuery>,
) -> AppResult<Json<ApiResponse<Vec<ProductSales>>>> {
    require_manager(&user)?;

    let limit = match query.limit.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|l| (1..=MAX_BEST_SELLING_LIMIT).contains(l))
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::ValueOutOfRange, "Invalid limit")
                    .with_detail("limit", raw)
            })?,
        None => DEFAULT_BEST_SELLING_LIMIT,
    };

    let range = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => Some(ordered_range(parse_date(start)?, parse_date(end)?)?),
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "startDate and endDate must be given together",
            ));
        }
    };

    let rows = state.reports.best_selling(limit, range).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Stock valuation at cost
pub async fn inventory_value(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<InventoryValueReport>>> {
    require_manager(&user)?;
    let report = state.reports.inventory_value().await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Catalog breakdown per category
pub async fn product_categories(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<CategoryMix>>>> {
    require_manager(&user)?;
    let rows = state.reports.category_mix().await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Orders and sales per user (admin)
pub async fn user_activity(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<UserActivity>>>> {
    require_admin(&user)?;
    let rows = state.reports.user_activity().await?;
    Ok(Json(ApiResponse::success(rows)))
}
