//! User Repository
//!
//! Accounts are provisioned by the identity service; this side only needs
//! lookups plus an insert for seeding.

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate};
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, username, email, first_name, last_name, role, active, created_at FROM users";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY username");
    let users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(users)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if data.username.trim().is_empty() {
        return Err(RepoError::Validation("Username is required".into()));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, first_name, last_name, role, active, created_at) VALUES (?, ?, ?, ?, ?, 1, ?) RETURNING id",
    )
    .bind(data.username.trim())
    .bind(&data.email)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(data.role)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
