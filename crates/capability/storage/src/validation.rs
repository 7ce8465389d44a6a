//! 验证辅助函数
//!
//! 提供统一的验证逻辑，确保数据一致性：
//! - ensure_owner：验证用户 ID 非空
//! - ensure_tank_scope：验证水族箱作用域（用户 + 水族箱）
//!
//! 使用场景：
//! - 所有数据访问前验证所有者上下文
//! - 水族箱级资源（放养、测量、任务、日志）访问前验证作用域

use crate::error::StorageError;
use domain::OwnerContext;

/// 验证用户 ID 非空
///
/// 确保所有数据访问都有有效的所有者上下文。
pub fn ensure_owner(ctx: &OwnerContext) -> Result<(), StorageError> {
    if ctx.user_id.is_empty() {
        return Err(StorageError::scope("user_id required"));
    }
    Ok(())
}

/// 验证水族箱作用域
///
/// 上下文带有 `tank_scope` 时，只允许访问该水族箱下的资源。
pub fn ensure_tank_scope(ctx: &OwnerContext, tank_id: &str) -> Result<(), StorageError> {
    ensure_owner(ctx)?;
    if let Some(scope) = ctx.tank_scope.as_deref() {
        if scope != tank_id {
            return Err(StorageError::scope("tank scope mismatch"));
        }
    }
    Ok(())
}
