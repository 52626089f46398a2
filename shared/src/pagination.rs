//! Pagination envelope

use serde::{Deserialize, Serialize};

/// Page metadata returned alongside every paged listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 当前页码 (1-based)
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总记录数
    pub total: u64,
    /// 总页数 = ceil(total / limit)
    pub pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit > 0 {
            total.div_ceil(limit as u64) as u32
        } else {
            1
        };

        Self {
            page,
            limit,
            total,
            pages,
        }
    }

    /// Row offset of the first record on this page
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.limit as u64
    }
}
