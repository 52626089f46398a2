//! 时间工具函数: 业务时区转换
//!
//! 所有日期→时间戳转换统一在 handler / criteria 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}. Use YYYY-MM-DD", date)))
}

/// 解析日期: `YYYY-MM-DD` 或 RFC 3339 时间戳
///
/// RFC 3339 输入取其在业务时区中的日历日期。
pub fn parse_calendar_date(value: &str, tz: Tz) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&tz).date_naive())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 本地零点不存在时 fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Unix millis → 业务时区日历日期 (YYYY-MM-DD)
pub fn millis_to_date_string(millis: i64, tz: Tz) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&tz).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 解析业务时区名称 (IANA)，失败返回 UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse BUSINESS_TIMEZONE '{}': {}, falling back to UTC",
            name,
            e
        );
        Tz::UTC
    })
}
