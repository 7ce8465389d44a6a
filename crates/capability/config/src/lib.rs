//! 应用运行配置加载。

use std::env;

/// 与建议引擎的趋势窗口上限一致。
const MAX_TREND_WINDOW: usize = 100;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
///
/// 建议引擎阈值只在此处读取，由应用层覆盖到 `AdvisorRules` 默认值之上。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 为空时使用内存存储（带演示物种目录）。
    pub database_url: Option<String>,
    pub trend_window: usize,
    pub default_max_tds: f64,
    pub water_change_interval_days: i64,
    pub filter_clean_interval_days: i64,
    pub bioload_alert_percent: f64,
    pub currency: String,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr =
            env::var("AQUA_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let database_url = read_optional("AQUA_DATABASE_URL");
        let trend_window = read_usize_with_default("AQUA_TREND_WINDOW", 10)?;
        if !(2..=MAX_TREND_WINDOW).contains(&trend_window) {
            return Err(ConfigError::Invalid(
                "AQUA_TREND_WINDOW".to_string(),
                trend_window.to_string(),
            ));
        }
        let default_max_tds = read_f64_with_default("AQUA_DEFAULT_MAX_TDS", 500.0)?;
        let water_change_interval_days =
            read_i64_with_default("AQUA_WATER_CHANGE_INTERVAL_DAYS", 7)?;
        let filter_clean_interval_days =
            read_i64_with_default("AQUA_FILTER_CLEAN_INTERVAL_DAYS", 30)?;
        let bioload_alert_percent = read_f64_with_default("AQUA_BIOLOAD_ALERT_PERCENT", 80.0)?;
        let currency = read_optional("AQUA_CURRENCY").unwrap_or_else(|| "UAH".to_string());

        Ok(Self {
            http_addr,
            database_url,
            trend_window,
            default_max_tds,
            water_change_interval_days,
            filter_clean_interval_days,
            bioload_alert_percent,
            currency,
        })
    }
}

fn read_usize_with_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_i64_with_default(key: &str, default: i64) -> Result<i64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<i64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_f64_with_default(key: &str, default: f64) -> Result<f64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
