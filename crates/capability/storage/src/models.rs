//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 水族箱模型：TankRecord, TankTargets, TankUpdate, TankTargetsUpdate
//! - 物种目录：SpeciesRecord, SpeciesUpdate
//! - 放养关系：StockingRecord
//! - 测量模型：SensorMeasurementRecord, ManualMeasurementRecord
//! - 设备模型：DeviceRecord
//! - 维护任务：TaskRecord
//! - 活动日志：ActivityLogRecord
//!
//! 时间统一使用毫秒时间戳（`*_ms`）。

use domain::{Aggressiveness, InhabitantKind, SensorParameter, WaterType};

// ============================================================================
// 水族箱
// ============================================================================

/// 水族箱目标范围与毒素上限。
///
/// `auto_targets` 打开时，温度与 pH 区间由放养生物推导，不接受用户输入。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankTargets {
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub ph_min: Option<f64>,
    pub ph_max: Option<f64>,
    pub tds_min: Option<f64>,
    pub tds_max: Option<f64>,
    pub gh_min: Option<f64>,
    pub gh_max: Option<f64>,
    pub kh_min: Option<f64>,
    pub kh_max: Option<f64>,
    pub ammonia_max: Option<f64>,
    pub nitrite_max: Option<f64>,
    pub nitrate_max: Option<f64>,
    pub phosphate_max: Option<f64>,
}

impl TankTargets {
    /// 是否已建立完整的温度区间。
    pub fn temp_range(&self) -> Option<(f64, f64)> {
        self.temp_min.zip(self.temp_max)
    }

    /// 是否已建立完整的 pH 区间。
    pub fn ph_range(&self) -> Option<(f64, f64)> {
        self.ph_min.zip(self.ph_max)
    }
}

/// 水族箱记录。
#[derive(Debug, Clone)]
pub struct TankRecord {
    pub tank_id: String,
    pub owner_id: String,
    pub name: String,
    pub volume_l: f64,
    pub length_cm: Option<i32>,
    pub width_cm: Option<i32>,
    pub height_cm: Option<i32>,
    pub water_type: WaterType,
    pub start_date_ms: Option<i64>,
    pub description: Option<String>,
    pub has_plants: bool,
    pub auto_targets: bool,
    pub targets: TankTargets,
}

/// 水族箱基本信息更新输入（不含目标范围）。
#[derive(Debug, Clone, Default)]
pub struct TankUpdate {
    pub name: Option<String>,
    pub volume_l: Option<f64>,
    pub length_cm: Option<i32>,
    pub width_cm: Option<i32>,
    pub height_cm: Option<i32>,
    pub water_type: Option<WaterType>,
    pub start_date_ms: Option<i64>,
    pub description: Option<String>,
    pub has_plants: Option<bool>,
}

/// 目标范围更新输入。
///
/// 每个 `Some` 字段覆盖对应目标；`auto_targets` 总是显式写入。
#[derive(Debug, Clone, Default)]
pub struct TankTargetsUpdate {
    pub auto_targets: bool,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub ph_min: Option<f64>,
    pub ph_max: Option<f64>,
    pub tds_min: Option<f64>,
    pub tds_max: Option<f64>,
    pub gh_min: Option<f64>,
    pub gh_max: Option<f64>,
    pub kh_min: Option<f64>,
    pub kh_max: Option<f64>,
    pub ammonia_max: Option<f64>,
    pub nitrite_max: Option<f64>,
    pub nitrate_max: Option<f64>,
    pub phosphate_max: Option<f64>,
}

impl TankTargetsUpdate {
    /// 将更新应用到已有目标上。
    pub fn apply_to(&self, targets: &mut TankTargets) {
        fn set(slot: &mut Option<f64>, value: Option<f64>) {
            if let Some(value) = value {
                *slot = Some(value);
            }
        }
        set(&mut targets.temp_min, self.temp_min);
        set(&mut targets.temp_max, self.temp_max);
        set(&mut targets.ph_min, self.ph_min);
        set(&mut targets.ph_max, self.ph_max);
        set(&mut targets.tds_min, self.tds_min);
        set(&mut targets.tds_max, self.tds_max);
        set(&mut targets.gh_min, self.gh_min);
        set(&mut targets.gh_max, self.gh_max);
        set(&mut targets.kh_min, self.kh_min);
        set(&mut targets.kh_max, self.kh_max);
        set(&mut targets.ammonia_max, self.ammonia_max);
        set(&mut targets.nitrite_max, self.nitrite_max);
        set(&mut targets.nitrate_max, self.nitrate_max);
        set(&mut targets.phosphate_max, self.phosphate_max);
    }
}

// ============================================================================
// 物种目录
// ============================================================================

/// 物种目录记录（对建议引擎只读）。
#[derive(Debug, Clone)]
pub struct SpeciesRecord {
    pub species_id: String,
    pub kind: InhabitantKind,
    pub name: String,
    pub latin_name: Option<String>,
    pub size_cm: Option<f64>,
    pub aggressiveness: Option<Aggressiveness>,
    pub feeding_frequency: Option<String>,
    pub min_tank_size_l: Option<f64>,
    pub min_water_volume_l: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub ph_min: Option<f64>,
    pub ph_max: Option<f64>,
}

/// 物种更新输入。
#[derive(Debug, Clone, Default)]
pub struct SpeciesUpdate {
    pub name: Option<String>,
    pub latin_name: Option<String>,
    pub size_cm: Option<f64>,
    pub aggressiveness: Option<Aggressiveness>,
    pub feeding_frequency: Option<String>,
    pub min_tank_size_l: Option<f64>,
    pub min_water_volume_l: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub ph_min: Option<f64>,
    pub ph_max: Option<f64>,
}

// ============================================================================
// 放养关系
// ============================================================================

/// 放养记录：每个 (tank, species) 组合唯一。
#[derive(Debug, Clone, PartialEq)]
pub struct StockingRecord {
    pub tank_id: String,
    pub species_id: String,
    pub quantity: u32,
    pub added_at_ms: i64,
}

// ============================================================================
// 测量
// ============================================================================

/// 设备传感器读数（只追加）。
#[derive(Debug, Clone, PartialEq)]
pub struct SensorMeasurementRecord {
    pub measurement_id: String,
    pub device_id: String,
    pub ts_ms: i64,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
    pub turbidity: Option<f64>,
}

impl SensorMeasurementRecord {
    /// 读取指定参数的值。
    pub fn value_of(&self, parameter: SensorParameter) -> Option<f64> {
        match parameter {
            SensorParameter::Temperature => self.temperature,
            SensorParameter::Ph => self.ph,
            SensorParameter::Tds => self.tds,
            SensorParameter::Turbidity => self.turbidity,
        }
    }
}

/// 手动水质测试读数（只追加）。
#[derive(Debug, Clone, PartialEq)]
pub struct ManualMeasurementRecord {
    pub measurement_id: String,
    pub tank_id: String,
    pub ts_ms: i64,
    pub ammonia: Option<f64>,
    pub nitrite: Option<f64>,
    pub nitrate: Option<f64>,
    pub gh: Option<f64>,
    pub kh: Option<f64>,
    pub phosphate: Option<f64>,
}

// ============================================================================
// 设备、任务、活动日志
// ============================================================================

/// 智能控制设备记录。
///
/// `config` 为自由格式 JSON，由设备配置器覆盖 feeding/lighting/heating 三个子块。
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub device_id: String,
    pub owner_id: String,
    pub tank_id: Option<String>,
    pub api_key: String,
    pub name: Option<String>,
    pub power_watts: Option<f64>,
    pub config: serde_json::Value,
}

/// 维护任务记录。
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub task_id: String,
    pub owner_id: String,
    pub tank_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date_ms: i64,
    pub recurrence: Option<String>,
    pub is_active: bool,
}

/// 活动日志记录（只追加）。
#[derive(Debug, Clone)]
pub struct ActivityLogRecord {
    pub activity_id: String,
    pub tank_id: String,
    pub ts_ms: i64,
    pub description: String,
    pub event_type: String,
}
