use aqua_config::{AppConfig, ConfigError};

// 环境变量是进程级共享状态，放在同一个测试里顺序执行。
#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("AQUA_HTTP_ADDR", "127.0.0.1:8081");
        std::env::remove_var("AQUA_DATABASE_URL");
        std::env::set_var("AQUA_TREND_WINDOW", "6");
        std::env::set_var("AQUA_CURRENCY", "EUR");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert!(config.database_url.is_none());
    assert_eq!(config.trend_window, 6);
    assert_eq!(config.default_max_tds, 500.0);
    assert_eq!(config.water_change_interval_days, 7);
    assert_eq!(config.filter_clean_interval_days, 30);
    assert_eq!(config.bioload_alert_percent, 80.0);
    assert_eq!(config.currency, "EUR");

    unsafe {
        std::env::set_var("AQUA_DEFAULT_MAX_TDS", "lots");
    }
    let err = AppConfig::from_env().expect_err("invalid number");
    assert!(matches!(err, ConfigError::Invalid(key, _) if key == "AQUA_DEFAULT_MAX_TDS"));

    unsafe {
        std::env::remove_var("AQUA_DEFAULT_MAX_TDS");
        std::env::set_var("AQUA_TREND_WINDOW", "1");
    }
    assert!(AppConfig::from_env().is_err());

    unsafe {
        std::env::set_var("AQUA_TREND_WINDOW", "101");
    }
    assert!(AppConfig::from_env().is_err());

    unsafe {
        std::env::remove_var("AQUA_TREND_WINDOW");
    }
}
