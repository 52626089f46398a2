//! Search criteria parsing
//!
//! Query-string values arrive as raw strings and are parsed into a typed
//! [`OrderSearchCriteria`] before any storage access. Empty strings count as
//! absent, so a blank form field means "no constraint".

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use shared::Pagination;
use shared::models::{OrderStatus, PaymentMethod};

use super::error::SearchError;
use crate::utils::time::{day_end_millis, day_start_millis, parse_calendar_date};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw query parameters of `GET /api/orders/search`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSearchParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub page: Option<String>,
    #[serde(alias = "pageSize")]
    pub limit: Option<String>,
}

/// Validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, SearchError> {
        if page < 1 {
            return Err(SearchError::InvalidPage(page.to_string()));
        }
        if limit < 1 || limit > MAX_PAGE_SIZE {
            return Err(SearchError::InvalidPageSize(limit.to_string()));
        }
        Ok(Self { page, limit })
    }

    /// Parse `page` / `limit` query values, absent values take the defaults
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, SearchError> {
        let page = match present(page) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| SearchError::InvalidPage(raw.to_string()))?,
            None => DEFAULT_PAGE,
        };
        let limit = match present(limit) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
                .ok_or_else(|| SearchError::InvalidPageSize(raw.to_string()))?,
            None => DEFAULT_PAGE_SIZE,
        };
        Self::new(page, limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    pub fn pagination(&self, total: i64) -> Pagination {
        Pagination::new(self.page, self.limit, total.max(0) as u64)
    }
}

/// Typed search criteria; `None` means no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSearchCriteria {
    /// Inclusive lower bound on created_at (Unix millis)
    pub created_from: Option<i64>,
    /// Exclusive upper bound on created_at (start of the day after end date)
    pub created_before: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<OrderStatus>,
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
}

impl OrderSearchCriteria {
    /// Validate raw parameters; dates are resolved to day bounds in `tz`
    pub fn parse(
        params: &OrderSearchParams,
        tz: Tz,
    ) -> Result<(Self, PageRequest), SearchError> {
        let page = PageRequest::parse(params.page.as_deref(), params.limit.as_deref())?;

        let start = parse_date_param("startDate", params.start_date.as_deref(), tz)?;
        let end = parse_date_param("endDate", params.end_date.as_deref(), tz)?;
        if let (Some(s), Some(e)) = (start, end)
            && s > e
        {
            return Err(SearchError::InvalidDateRange {
                start: s.to_string(),
                end: e.to_string(),
            });
        }

        let min_amount = parse_amount_param("minAmount", params.min_amount.as_deref())?;
        let max_amount = parse_amount_param("maxAmount", params.max_amount.as_deref())?;
        if let (Some(min), Some(max)) = (min_amount, max_amount)
            && min > max
        {
            return Err(SearchError::InvalidAmountRange { min, max });
        }

        let payment_method = match present(params.payment_method.as_deref()) {
            Some(raw) => Some(PaymentMethod::parse(raw).ok_or_else(|| {
                SearchError::InvalidFilter {
                    field: "paymentMethod",
                    value: raw.to_string(),
                }
            })?),
            None => None,
        };
        let status = match present(params.status.as_deref()) {
            Some(raw) => Some(OrderStatus::parse(raw).ok_or_else(|| {
                SearchError::InvalidFilter {
                    field: "status",
                    value: raw.to_string(),
                }
            })?),
            None => None,
        };

        let criteria = Self {
            created_from: start.map(|d| day_start_millis(d, tz)),
            created_before: end.map(|d| day_end_millis(d, tz)),
            min_amount,
            max_amount,
            payment_method,
            status,
            user_id: parse_id_param("userId", params.user_id.as_deref())?,
            product_id: parse_id_param("productId", params.product_id.as_deref())?,
        };
        Ok((criteria, page))
    }

    /// Number of active constraints
    pub fn filter_count(&self) -> usize {
        [
            self.created_from.is_some(),
            self.created_before.is_some(),
            self.min_amount.is_some(),
            self.max_amount.is_some(),
            self.payment_method.is_some(),
            self.status.is_some(),
            self.user_id.is_some(),
            self.product_id.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date_param(
    field: &'static str,
    value: Option<&str>,
    tz: Tz,
) -> Result<Option<NaiveDate>, SearchError> {
    let Some(raw) = present(value) else {
        return Ok(None);
    };
    parse_calendar_date(raw, tz)
        .map(Some)
        .ok_or_else(|| SearchError::InvalidDate {
            field,
            value: raw.to_string(),
        })
}

fn parse_amount_param(field: &'static str, value: Option<&str>) -> Result<Option<f64>, SearchError> {
    let Some(raw) = present(value) else {
        return Ok(None);
    };
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(Some)
        .ok_or_else(|| SearchError::InvalidAmount {
            field,
            value: raw.to_string(),
        })
}

fn parse_id_param(field: &'static str, value: Option<&str>) -> Result<Option<i64>, SearchError> {
    let Some(raw) = present(value) else {
        return Ok(None);
    };
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(Some)
        .ok_or_else(|| SearchError::InvalidFilter {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> OrderSearchParams {
        OrderSearchParams::default()
    }

    #[test]
    fn test_defaults() {
        let (criteria, page) = OrderSearchCriteria::parse(&params(), Tz::UTC).unwrap();
        assert_eq!(criteria, OrderSearchCriteria::default());
        assert_eq!(criteria.filter_count(), 0);
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_validation() {
        assert!(matches!(
            PageRequest::parse(Some("0"), None),
            Err(SearchError::InvalidPage(_))
        ));
        assert!(matches!(
            PageRequest::parse(Some("-2"), None),
            Err(SearchError::InvalidPage(_))
        ));
        assert!(matches!(
            PageRequest::parse(Some("two"), None),
            Err(SearchError::InvalidPage(_))
        ));
        assert!(matches!(
            PageRequest::parse(None, Some("0")),
            Err(SearchError::InvalidPageSize(_))
        ));
        assert!(matches!(
            PageRequest::parse(None, Some("101")),
            Err(SearchError::InvalidPageSize(_))
        ));
        let page = PageRequest::parse(Some("3"), Some("100")).unwrap();
        assert_eq!(page.offset(), 200);
    }

    #[test]
    fn test_blank_values_are_absent() {
        let p = OrderSearchParams {
            status: Some("".into()),
            start_date: Some("  ".into()),
            page: Some("".into()),
            ..params()
        };
        let (criteria, page) = OrderSearchCriteria::parse(&p, Tz::UTC).unwrap();
        assert_eq!(criteria.filter_count(), 0);
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn test_single_day_range_covers_whole_day() {
        let p = OrderSearchParams {
            start_date: Some("2024-01-05".into()),
            end_date: Some("2024-01-05".into()),
            ..params()
        };
        let (criteria, _) = OrderSearchCriteria::parse(&p, Tz::UTC).unwrap();
        assert_eq!(criteria.created_from, Some(1_704_412_800_000));
        assert_eq!(criteria.created_before, Some(1_704_412_800_000 + 86_400_000));
    }

    #[test]
    fn test_date_range_order() {
        let p = OrderSearchParams {
            start_date: Some("2024-01-06".into()),
            end_date: Some("2024-01-05".into()),
            ..params()
        };
        assert!(matches!(
            OrderSearchCriteria::parse(&p, Tz::UTC),
            Err(SearchError::InvalidDateRange { .. })
        ));

        let p = OrderSearchParams {
            start_date: Some("01/05/2024".into()),
            ..params()
        };
        assert!(matches!(
            OrderSearchCriteria::parse(&p, Tz::UTC),
            Err(SearchError::InvalidDate {
                field: "startDate",
                ..
            })
        ));
    }

    #[test]
    fn test_amount_validation() {
        let p = OrderSearchParams {
            min_amount: Some("20".into()),
            max_amount: Some("10".into()),
            ..params()
        };
        assert!(matches!(
            OrderSearchCriteria::parse(&p, Tz::UTC),
            Err(SearchError::InvalidAmountRange { .. })
        ));

        for bad in ["abc", "-1", "NaN", "inf"] {
            let p = OrderSearchParams {
                max_amount: Some(bad.into()),
                ..params()
            };
            assert!(matches!(
                OrderSearchCriteria::parse(&p, Tz::UTC),
                Err(SearchError::InvalidAmount { .. })
            ));
        }

        let p = OrderSearchParams {
            min_amount: Some("5".into()),
            ..params()
        };
        let (criteria, _) = OrderSearchCriteria::parse(&p, Tz::UTC).unwrap();
        assert_eq!(criteria.min_amount, Some(5.0));
        assert_eq!(criteria.max_amount, None);
    }

    #[test]
    fn test_filters() {
        let p = OrderSearchParams {
            payment_method: Some("card".into()),
            status: Some("cancelled".into()),
            user_id: Some("7".into()),
            product_id: Some("3".into()),
            ..params()
        };
        let (criteria, _) = OrderSearchCriteria::parse(&p, Tz::UTC).unwrap();
        assert_eq!(criteria.payment_method, Some(PaymentMethod::Card));
        assert_eq!(criteria.status, Some(OrderStatus::Cancelled));
        assert_eq!(criteria.user_id, Some(7));
        assert_eq!(criteria.product_id, Some(3));
        assert_eq!(criteria.filter_count(), 4);

        let p = OrderSearchParams {
            status: Some("refunded".into()),
            ..params()
        };
        assert!(matches!(
            OrderSearchCriteria::parse(&p, Tz::UTC),
            Err(SearchError::InvalidFilter { field: "status", .. })
        ));

        let p = OrderSearchParams {
            user_id: Some("1 OR 1=1".into()),
            ..params()
        };
        assert!(matches!(
            OrderSearchCriteria::parse(&p, Tz::UTC),
            Err(SearchError::InvalidFilter { field: "userId", .. })
        ));
    }

    #[test]
    fn test_params_deserialize_camel_case() {
        let p: OrderSearchParams = serde_json::from_value(serde_json::json!({
            "startDate": "2024-01-05",
            "paymentMethod": "cash",
            "pageSize": "25"
        }))
        .unwrap();
        assert_eq!(p.start_date.as_deref(), Some("2024-01-05"));
        assert_eq!(p.payment_method.as_deref(), Some("cash"));
        assert_eq!(p.limit.as_deref(), Some("25"));
    }
}
