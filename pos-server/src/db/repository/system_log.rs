//! System Log Repository (append-only)

use super::RepoResult;
use shared::models::{LogCategory, LogLevel, SystemLog};
use sqlx::SqlitePool;

/// Log filter, all fields optional
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub category: Option<LogCategory>,
    pub user_id: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

pub async fn insert(
    pool: &SqlitePool,
    level: LogLevel,
    category: LogCategory,
    message: &str,
    details: &serde_json::Value,
    user_id: Option<i64>,
    created_at: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO system_logs (level, category, message, details, user_id, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(level)
    .bind(category)
    .bind(message)
    .bind(sqlx::types::Json(details))
    .bind(user_id)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Newest first, with the total matching the filter
pub async fn query(pool: &SqlitePool, filter: &LogFilter) -> RepoResult<(Vec<SystemLog>, i64)> {
    // 固定占位符, NULL 表示不过滤
    const WHERE: &str =
        "WHERE (?1 IS NULL OR level = ?1) AND (?2 IS NULL OR category = ?2) AND (?3 IS NULL OR user_id = ?3)";

    let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM system_logs {WHERE}"))
        .bind(filter.level)
        .bind(filter.category)
        .bind(filter.user_id)
        .fetch_one(pool)
        .await?;

    let logs = sqlx::query_as::<_, SystemLog>(&format!(
        "SELECT id, level, category, message, details, user_id, created_at FROM system_logs {WHERE} ORDER BY created_at DESC, id DESC LIMIT ?4 OFFSET ?5"
    ))
    .bind(filter.level)
    .bind(filter.category)
    .bind(filter.user_id)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(pool)
    .await?;

    Ok((logs, total))
}
