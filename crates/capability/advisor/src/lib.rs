//! 水族箱建议引擎。
//!
//! 规则模块均为纯函数，输入已加载的记录，输出建议结果：
//! - `compatibility`：新增物种的兼容性警告
//! - `stocking`：生物负载百分比与红黄绿状态
//! - `targets`：由放养物种推导温度 / pH 目标区间
//! - `device_config`：喂食、照明、加热配置
//! - `cycle`：氮循环阶段判定
//! - `trend`：传感器参数变化速率
//! - `tasks`：维护任务判定
//! - `economy`：月度运行成本
//!
//! `AdvisorService` 负责加载记录、串联规则并写回存储。

mod clock;
pub mod compatibility;
pub mod cycle;
pub mod device_config;
pub mod economy;
mod rules;
mod service;
pub mod stocking;
pub mod targets;
pub mod tasks;
pub mod trend;

use aqua_storage::{SpeciesRecord, StorageError};

pub use clock::{Clock, FixedClock, SystemClock};
pub use compatibility::check_compatibility;
pub use cycle::{CycleReport, CycleSignals, ToxinLevels, predict_cycle_status};
pub use device_config::build_device_config;
pub use economy::{
    Consumable, EconomyReport, EconomyRequest, ExpenseFrequency, calculate_monthly_cost,
};
pub use rules::AdvisorRules;
pub use service::{AddLivestockOutcome, AdvisorService, DiagnosticsReport};
pub use stocking::{StockingEstimate, StockingStatus, calculate_stocking};
pub use targets::{TargetRecalculation, derive_targets};
pub use tasks::{PlannedTask, TaskSignals, plan_tasks};
pub use trend::{TrendReport, analyze_trend};

/// 建议引擎错误。
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// 已放养物种及其数量。
#[derive(Debug, Clone)]
pub struct StockedSpecies {
    pub species: SpeciesRecord,
    pub quantity: u32,
}

/// 趋势与氮循环结果的提示颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalColor {
    Red,
    Orange,
    Yellow,
    Green,
    Grey,
    Blue,
}

impl SignalColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalColor::Red => "red",
            SignalColor::Orange => "orange",
            SignalColor::Yellow => "yellow",
            SignalColor::Green => "green",
            SignalColor::Grey => "grey",
            SignalColor::Blue => "blue",
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
