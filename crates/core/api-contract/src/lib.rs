//! 稳定的 DTO 与 API 响应契约。
//!
//! 记录类 DTO 使用 camelCase；建议结果类 DTO（生物负载、循环、趋势、任务生成、
//! 运行成本）保持 snake_case 字段名，与设备端和前端已有的解析保持一致。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

// ============================================================================
// 水族箱
// ============================================================================

/// 创建水族箱请求。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTankRequest {
    pub name: String,
    pub volume_l: f64,
    pub length_cm: Option<i32>,
    pub width_cm: Option<i32>,
    pub height_cm: Option<i32>,
    pub water_type: Option<String>,
    pub start_date_ms: Option<i64>,
    pub description: Option<String>,
    pub has_plants: Option<bool>,
}

/// 更新水族箱请求（只更新出现的字段）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTankRequest {
    pub name: Option<String>,
    pub volume_l: Option<f64>,
    pub length_cm: Option<i32>,
    pub width_cm: Option<i32>,
    pub height_cm: Option<i32>,
    pub water_type: Option<String>,
    pub start_date_ms: Option<i64>,
    pub description: Option<String>,
    pub has_plants: Option<bool>,
}

/// 目标范围。既是响应的一部分，也是 `PUT /tanks/:id/targets` 的请求体。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TankTargetsDto {
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TankDto {
    pub tank_id: String,
    pub name: String,
    pub volume_l: f64,
    pub length_cm: Option<i32>,
    pub width_cm: Option<i32>,
    pub height_cm: Option<i32>,
    pub water_type: String,
    pub start_date_ms: Option<i64>,
    pub description: Option<String>,
    pub has_plants: bool,
    pub auto_targets: bool,
    pub targets: TankTargetsDto,
}

// ============================================================================
// 物种目录与放养
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpeciesRequest {
    pub kind: String,
    pub name: String,
    pub latin_name: Option<String>,
    pub size_cm: Option<f64>,
    pub aggressiveness: Option<String>,
    pub feeding_frequency: Option<String>,
    pub min_tank_size_l: Option<f64>,
    pub min_water_volume_l: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub ph_min: Option<f64>,
    pub ph_max: Option<f64>,
}

/// 物种局部更新；类别创建后不可修改。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpeciesRequest {
    pub name: Option<String>,
    pub latin_name: Option<String>,
    pub size_cm: Option<f64>,
    pub aggressiveness: Option<String>,
    pub feeding_frequency: Option<String>,
    pub min_tank_size_l: Option<f64>,
    pub min_water_volume_l: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub ph_min: Option<f64>,
    pub ph_max: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDto {
    pub species_id: String,
    pub kind: String,
    pub name: String,
    pub latin_name: Option<String>,
    pub size_cm: Option<f64>,
    pub aggressiveness: Option<String>,
    pub feeding_frequency: Option<String>,
    pub min_tank_size_l: Option<f64>,
    pub min_water_volume_l: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub ph_min: Option<f64>,
    pub ph_max: Option<f64>,
}

/// 加入物种请求。`ignoreWarnings` 为真时即使有兼容性警告也会提交。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLivestockRequest {
    #[serde(alias = "species_id")]
    pub species_id: String,
    pub quantity: u32,
    #[serde(default, alias = "ignore_warnings")]
    pub ignore_warnings: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockingItemDto {
    pub species_id: String,
    pub name: String,
    pub quantity: u32,
    pub added_at_ms: i64,
}

// ============================================================================
// 建议结果（snake_case）
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StockingDto {
    pub percent: f64,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct TargetsResultDto {
    pub temp_min: f64,
    pub temp_max: f64,
    pub ph_min: f64,
    pub ph_max: f64,
    pub conflicts: Vec<String>,
    pub applied: bool,
}

#[derive(Debug, Serialize)]
pub struct AddLivestockResponse {
    pub added: bool,
    pub warnings: Vec<String>,
    pub stocking: StockingDto,
    pub targets: Option<TargetsResultDto>,
    pub device_config: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CycleStatusDto {
    pub status: String,
    pub percent: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrendDto {
    pub parameter: String,
    pub status: String,
    pub rate_per_hour: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsDto {
    pub warnings: Vec<String>,
    pub stocking: StockingDto,
    pub targets: Option<TargetsResultDto>,
    pub device_config: Option<Value>,
    pub cycle: CycleStatusDto,
    pub ph_trend: TrendDto,
    pub temperature_trend: TrendDto,
}

#[derive(Debug, Serialize)]
pub struct TargetsRecalculationResponse {
    pub targets: Option<TargetsResultDto>,
}

#[derive(Debug, Serialize)]
pub struct AutoTargetsResponse {
    pub tank: TankDto,
    pub targets: Option<TargetsResultDto>,
}

#[derive(Debug, Serialize)]
pub struct DeviceConfigResponse {
    pub device_config: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GenerateTasksResponse {
    pub tasks_created: usize,
}

/// 趋势查询参数。
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub parameter: Option<String>,
    pub window: Option<usize>,
}

// ============================================================================
// 维护任务与活动日志
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub task_id: String,
    pub tank_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date_ms: i64,
    pub recurrence: Option<String>,
    pub is_active: bool,
}

/// 记录一次维护活动，例如 `water_change` 或 `filter_clean`。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[serde(alias = "event_type")]
    pub event_type: String,
    pub description: Option<String>,
    pub ts_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub activity_id: String,
    pub tank_id: String,
    pub ts_ms: i64,
    pub description: String,
    pub event_type: String,
}

/// 历史列表查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub device_id: Option<String>,
}

// ============================================================================
// 测量
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualMeasurementRequest {
    pub ammonia: Option<f64>,
    pub nitrite: Option<f64>,
    pub nitrate: Option<f64>,
    pub gh: Option<f64>,
    pub kh: Option<f64>,
    pub phosphate: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualMeasurementDto {
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorMeasurementDto {
    pub measurement_id: String,
    pub device_id: String,
    pub ts_ms: i64,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
    pub turbidity: Option<f64>,
}

/// 设备上报的一组读数。
#[derive(Debug, Default, Deserialize)]
pub struct SensorValuesDto {
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
    pub turbidity: Option<f64>,
}

/// 设备上报请求，以设备密钥识别设备。
#[derive(Debug, Deserialize)]
pub struct SensorIngestRequest {
    #[serde(alias = "apiKey")]
    pub api_key: String,
    #[serde(default)]
    pub measurements: SensorValuesDto,
}

// ============================================================================
// 设备
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    pub api_key: String,
    pub name: Option<String>,
    pub power_watts: Option<f64>,
    pub tank_id: Option<String>,
}

/// 绑定设备到水族箱；`tankId` 为空表示解绑。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachDeviceRequest {
    pub tank_id: Option<String>,
}

/// 设备信息（不回传设备密钥）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDto {
    pub device_id: String,
    pub tank_id: Option<String>,
    pub name: Option<String>,
    pub power_watts: Option<f64>,
    pub config: Value,
}

// ============================================================================
// 运行成本
// ============================================================================

fn default_water_change_percent() -> f64 {
    30.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumableDto {
    pub name: String,
    pub price: f64,
    pub frequency: String,
}

#[derive(Debug, Deserialize)]
pub struct EconomyRequestDto {
    pub electricity_price: f64,
    pub water_price_m3: f64,
    #[serde(default = "default_water_change_percent")]
    pub manual_water_change_percent: f64,
    #[serde(default)]
    pub consumables: Vec<ConsumableDto>,
}

#[derive(Debug, Serialize)]
pub struct ElectricityBreakdownDto {
    pub watts_total: f64,
    pub kwh_month: f64,
    pub cost: f64,
}

#[derive(Debug, Serialize)]
pub struct WaterBreakdownDto {
    pub volume_m3: f64,
    pub cost: f64,
}

#[derive(Debug, Serialize)]
pub struct ConsumablesBreakdownDto {
    pub cost: f64,
    pub items_count: usize,
}

#[derive(Debug, Serialize)]
pub struct EconomyBreakdownDto {
    pub electricity: ElectricityBreakdownDto,
    pub water: WaterBreakdownDto,
    pub consumables: ConsumablesBreakdownDto,
}

#[derive(Debug, Serialize)]
pub struct EconomyResponseDto {
    pub total_monthly_cost: f64,
    pub currency: String,
    pub breakdown: EconomyBreakdownDto,
    pub message: String,
}

// ============================================================================
// 指标
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub compatibility_checks: u64,
    pub compatibility_warnings: u64,
    pub livestock_added: u64,
    pub livestock_rejected: u64,
    pub target_recalculations: u64,
    pub target_conflicts: u64,
    pub device_configs_written: u64,
    pub tasks_created: u64,
    pub sensor_readings_ingested: u64,
    pub manual_readings_recorded: u64,
}
