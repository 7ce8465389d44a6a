/// 建议引擎阈值表。
///
/// 所有启发式常量集中在这里，规则函数只读取本表，测试可按需覆盖。
#[derive(Debug, Clone)]
pub struct AdvisorRules {
    // 生物负载
    pub large_body_cm: f64,
    pub large_body_factor: f64,
    pub stocking_green_max: f64,
    pub stocking_yellow_max: f64,

    // 目标区间：开放初值与缺省物种容忍范围
    pub open_temp: (f64, f64),
    pub open_ph: (f64, f64),
    pub default_temp: (f64, f64),
    pub default_ph: (f64, f64),

    // 设备配置
    pub twice_daily_markers: &'static [&'static str],
    pub once_daily_markers: &'static [&'static str],
    pub twice_daily_interval_hours: u32,
    pub once_daily_interval_hours: u32,
    pub light_on_hour: u32,
    pub light_off_hour: u32,

    // 氮循环
    pub new_tank_days: i64,
    pub blind_early_days: i64,
    pub blind_late_days: i64,
    pub crash_after_days: i64,
    pub crash_toxin_level: f64,
    pub sterile_days: i64,

    // 趋势
    pub trend_window: usize,
    pub max_trend_window: usize,
    pub ph_rate_threshold: f64,
    pub temp_rate_threshold: f64,

    // 维护任务
    pub water_change_interval_days: i64,
    pub filter_clean_interval_days: i64,
    pub bioload_alert_percent: f64,
    pub default_max_tds: f64,
    pub missing_activity_days: i64,

    // 运行成本
    pub device_duty_cycle: f64,
    pub days_per_month: f64,
    pub water_changes_per_month: f64,
    pub currency: String,
}

impl Default for AdvisorRules {
    fn default() -> Self {
        Self {
            large_body_cm: 15.0,
            large_body_factor: 1.5,
            stocking_green_max: 80.0,
            stocking_yellow_max: 100.0,

            open_temp: (-100.0, 100.0),
            open_ph: (0.0, 14.0),
            default_temp: (22.0, 28.0),
            default_ph: (6.0, 8.0),

            twice_daily_markers: &["twice", "2x", "2 times", "2 рази"],
            once_daily_markers: &["once", "1x", "daily", "1 раз", "щодня"],
            twice_daily_interval_hours: 12,
            once_daily_interval_hours: 24,
            light_on_hour: 10,
            light_off_hour: 18,

            new_tank_days: 5,
            blind_early_days: 14,
            blind_late_days: 30,
            crash_after_days: 35,
            crash_toxin_level: 0.2,
            sterile_days: 10,

            trend_window: 10,
            max_trend_window: 100,
            ph_rate_threshold: 0.2,
            temp_rate_threshold: 2.0,

            water_change_interval_days: 7,
            filter_clean_interval_days: 30,
            bioload_alert_percent: 80.0,
            default_max_tds: 500.0,
            missing_activity_days: 999,

            device_duty_cycle: 0.6,
            days_per_month: 30.0,
            water_changes_per_month: 4.0,
            currency: "UAH".to_string(),
        }
    }
}
