//! 认证模块
//!
//! 会话签发在外部认证服务完成，本服务只负责：
//! - [`JwtService`] - 验证 Bearer 令牌
//! - [`CurrentUser`] - 当前用户上下文 (axum 提取器)
//! - 角色检查辅助函数

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};

use crate::utils::{AppError, AppResult, ErrorCode};

/// 店长或管理员
pub fn require_manager(user: &CurrentUser) -> AppResult<()> {
    if user.is_manager_or_admin() {
        return Ok(());
    }
    crate::security_log!(
        "WARN",
        "permission_denied",
        user_id = user.id,
        role = user.role.as_str(),
        required = "manager"
    );
    Err(AppError::with_message(
        ErrorCode::ManagerRequired,
        "Manager or admin role required",
    ))
}

/// 仅管理员
pub fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    crate::security_log!(
        "WARN",
        "permission_denied",
        user_id = user.id,
        role = user.role.as_str(),
        required = "admin"
    );
    Err(AppError::with_message(
        ErrorCode::AdminRequired,
        "Admin role required",
    ))
}
