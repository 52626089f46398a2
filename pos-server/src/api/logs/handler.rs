//! Audit Log API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use shared::Pagination;
use shared::models::{LogCategory, LogLevel, SystemLog};

use crate::audit::AuditQuery;
use crate::auth::{CurrentUser, require_admin};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

const DEFAULT_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub level: Option<String>,
    pub category: Option<String>,
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub logs: Vec<SystemLog>,
    pub pagination: Pagination,
}

impl LogQuery {
    fn into_audit_query(self) -> AppResult<AuditQuery> {
        let level = match self.level.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                LogLevel::parse(raw)
                    .ok_or_else(|| AppError::validation(format!("Unknown log level: {raw}")))?,
            ),
            None => None,
        };
        let category = match self.category.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                LogCategory::parse(raw)
                    .ok_or_else(|| AppError::validation(format!("Unknown log category: {raw}")))?,
            ),
            None => None,
        };

        Ok(AuditQuery {
            level,
            category,
            user_id: self.user_id,
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        })
    }
}

/// Newest entries first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<ApiResponse<LogListResponse>>> {
    require_admin(&user)?;
    let (logs, pagination) = state.audit.query(&query.into_audit_query()?).await?;
    Ok(Json(ApiResponse::success(LogListResponse { logs, pagination })))
}
