pub mod catalog;
pub mod data;

pub use catalog::{Aggressiveness, InhabitantKind, WaterType};
pub use data::{DAY_MS, HOUR_MS, SensorParameter, days_between};

/// 所有者上下文：所有模块共享的执行上下文。
///
/// 认证由上游网关完成，这里只携带已确认的用户身份与可选的水族箱作用域。
#[derive(Debug, Clone)]
pub struct OwnerContext {
    pub user_id: String,
    pub tank_scope: Option<String>,
}

impl OwnerContext {
    /// 构造显式身份的所有者上下文。
    pub fn new(user_id: impl Into<String>, tank_scope: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tank_scope,
        }
    }

    /// 复制上下文并限定到指定水族箱。
    pub fn scoped_to(&self, tank_id: &str) -> Self {
        Self {
            user_id: self.user_id.clone(),
            tank_scope: Some(tank_id.to_string()),
        }
    }
}

impl Default for OwnerContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            user_id: "".to_string(),
            tank_scope: None,
        }
    }
}
