/// 一小时的毫秒数。
pub const HOUR_MS: i64 = 3_600_000;

/// 一天的毫秒数。
pub const DAY_MS: i64 = 86_400_000;

/// 设备传感器上报的参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorParameter {
    Temperature,
    Ph,
    Tds,
    Turbidity,
}

impl SensorParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorParameter::Temperature => "temperature",
            SensorParameter::Ph => "ph",
            SensorParameter::Tds => "tds",
            SensorParameter::Turbidity => "turbidity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Some(SensorParameter::Temperature),
            "ph" => Some(SensorParameter::Ph),
            "tds" => Some(SensorParameter::Tds),
            "turbidity" => Some(SensorParameter::Turbidity),
            _ => None,
        }
    }
}

/// 两个毫秒时间戳之间经过的整天数（向下取整）。
pub fn days_between(from_ms: i64, to_ms: i64) -> i64 {
    (to_ms - from_ms).div_euclid(DAY_MS)
}
