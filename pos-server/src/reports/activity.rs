//! Staff activity report

use shared::models::UserActivity;

use super::ReportService;
use crate::db::repository::RepoResult;

impl ReportService {
    /// Every user with their order count, sales and latest order time
    pub async fn user_activity(&self) -> RepoResult<Vec<UserActivity>> {
        let rows = sqlx::query_as::<_, UserActivity>(
            "SELECT u.id AS user_id, u.username, u.role, COUNT(o.id) AS orders_count, ROUND(IFNULL(SUM(o.total_amount), 0), 2) AS total_sales, MAX(o.created_at) AS last_active FROM users u LEFT JOIN orders o ON o.user_id = u.id GROUP BY u.id ORDER BY total_sales DESC, u.username",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
