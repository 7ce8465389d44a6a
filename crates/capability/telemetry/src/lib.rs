//! 追踪、请求 ID 与建议引擎计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
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

/// 进程级计数器。
pub struct TelemetryMetrics {
    compatibility_checks: AtomicU64,
    compatibility_warnings: AtomicU64,
    livestock_added: AtomicU64,
    livestock_rejected: AtomicU64,
    target_recalculations: AtomicU64,
    target_conflicts: AtomicU64,
    device_configs_written: AtomicU64,
    tasks_created: AtomicU64,
    sensor_readings_ingested: AtomicU64,
    manual_readings_recorded: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            compatibility_checks: AtomicU64::new(0),
            compatibility_warnings: AtomicU64::new(0),
            livestock_added: AtomicU64::new(0),
            livestock_rejected: AtomicU64::new(0),
            target_recalculations: AtomicU64::new(0),
            target_conflicts: AtomicU64::new(0),
            device_configs_written: AtomicU64::new(0),
            tasks_created: AtomicU64::new(0),
            sensor_readings_ingested: AtomicU64::new(0),
            manual_readings_recorded: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            compatibility_checks: self.compatibility_checks.load(Ordering::Relaxed),
            compatibility_warnings: self.compatibility_warnings.load(Ordering::Relaxed),
            livestock_added: self.livestock_added.load(Ordering::Relaxed),
            livestock_rejected: self.livestock_rejected.load(Ordering::Relaxed),
            target_recalculations: self.target_recalculations.load(Ordering::Relaxed),
            target_conflicts: self.target_conflicts.load(Ordering::Relaxed),
            device_configs_written: self.device_configs_written.load(Ordering::Relaxed),
            tasks_created: self.tasks_created.load(Ordering::Relaxed),
            sensor_readings_ingested: self.sensor_readings_ingested.load(Ordering::Relaxed),
            manual_readings_recorded: self.manual_readings_recorded.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录一次兼容性检查及其产生的警告数。
pub fn record_compatibility_check(warnings: usize) {
    let metrics = metrics();
    metrics.compatibility_checks.fetch_add(1, Ordering::Relaxed);
    metrics
        .compatibility_warnings
        .fetch_add(warnings as u64, Ordering::Relaxed);
}

/// 记录放养成功。
pub fn record_livestock_added() {
    metrics().livestock_added.fetch_add(1, Ordering::Relaxed);
}

/// 记录因警告未提交的放养。
pub fn record_livestock_rejected() {
    metrics().livestock_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录目标范围重算；`conflicts` 为空交集诊断数。
pub fn record_target_recalculation(conflicts: usize) {
    let metrics = metrics();
    metrics.target_recalculations.fetch_add(1, Ordering::Relaxed);
    metrics
        .target_conflicts
        .fetch_add(conflicts as u64, Ordering::Relaxed);
}

pub fn record_device_config_written() {
    metrics()
        .device_configs_written
        .fetch_add(1, Ordering::Relaxed);
}

pub fn record_tasks_created(count: usize) {
    metrics()
        .tasks_created
        .fetch_add(count as u64, Ordering::Relaxed);
}

/// 记录设备上报读数。
pub fn record_sensor_reading() {
    metrics()
        .sensor_readings_ingested
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录手动水质测试。
pub fn record_manual_reading() {
    metrics()
        .manual_readings_recorded
        .fetch_add(1, Ordering::Relaxed);
}
