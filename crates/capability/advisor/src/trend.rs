//! 传感器参数趋势分析。

use crate::{AdvisorRules, SignalColor, round_to};
use aqua_storage::SensorMeasurementRecord;
use domain::{HOUR_MS, SensorParameter};

#[derive(Debug, Clone, PartialEq)]
pub struct TrendReport {
    pub status: &'static str,
    pub rate_per_hour: f64,
    pub message: String,
    pub color: Option<SignalColor>,
}

impl TrendReport {
    fn unknown() -> Self {
        Self {
            status: "Unknown",
            rate_per_hour: 0.0,
            message: "Not enough data for trend analysis.".to_string(),
            color: None,
        }
    }
}

/// 计算参数在最近 `window` 个读数上的每小时变化率。
///
/// `readings` 按时间从新到旧排列；没有该参数值的读数被跳过。
/// 只比较窗口内最新与最旧的两个读数。
pub fn analyze_trend(
    parameter: SensorParameter,
    readings: &[SensorMeasurementRecord],
    window: usize,
    rules: &AdvisorRules,
) -> TrendReport {
    let points: Vec<(i64, f64)> = readings
        .iter()
        .filter_map(|reading| reading.value_of(parameter).map(|value| (reading.ts_ms, value)))
        .take(window)
        .collect();
    let (Some(&(newest_ts, newest)), Some(&(oldest_ts, oldest))) = (points.first(), points.last())
    else {
        return TrendReport::unknown();
    };
    if points.len() < 2 {
        return TrendReport::unknown();
    }
    if newest_ts == oldest_ts {
        return TrendReport {
            status: "Error",
            rate_per_hour: 0.0,
            message: "Measurement timestamps are identical, cannot compute a rate.".to_string(),
            color: None,
        };
    }

    let hours = (newest_ts - oldest_ts) as f64 / HOUR_MS as f64;
    let rate = (newest - oldest) / hours;

    match parameter {
        SensorParameter::Ph if rate < -rules.ph_rate_threshold => TrendReport {
            status: "CRITICAL DROP",
            rate_per_hour: round_to(rate, 3),
            message: format!(
                "WARNING! pH is dropping fast! ({} per hour). Risk of pH shock.",
                round_to(rate, 2)
            ),
            color: Some(SignalColor::Red),
        },
        SensorParameter::Ph if rate > rules.ph_rate_threshold => TrendReport {
            status: "Rapid Rise",
            rate_per_hour: round_to(rate, 3),
            message: format!(
                "pH is rising fast ({} per hour). Possible ammonia release.",
                round_to(rate, 2)
            ),
            color: Some(SignalColor::Orange),
        },
        SensorParameter::Temperature if rate.abs() > rules.temp_rate_threshold => TrendReport {
            status: "Temp Shock",
            rate_per_hour: round_to(rate, 2),
            message: "Temperature shock! Water temperature is changing too fast.".to_string(),
            color: Some(SignalColor::Red),
        },
        _ => TrendReport {
            status: "Stable",
            rate_per_hour: round_to(rate, 3),
            message: "Parameters are stable.".to_string(),
            color: Some(SignalColor::Green),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ts_ms: i64, ph: Option<f64>, temperature: Option<f64>) -> SensorMeasurementRecord {
        SensorMeasurementRecord {
            measurement_id: format!("m-{ts_ms}"),
            device_id: "dev-1".to_string(),
            ts_ms,
            temperature,
            ph,
            tds: None,
            turbidity: None,
        }
    }

    #[test]
    fn ph_drop_over_two_hours_is_critical() {
        let readings = vec![reading(2 * HOUR_MS, Some(5.0), None), reading(0, Some(6.0), None)];
        let report = analyze_trend(SensorParameter::Ph, &readings, 10, &AdvisorRules::default());
        assert_eq!(report.status, "CRITICAL DROP");
        assert_eq!(report.rate_per_hour, -0.5);
        assert_eq!(report.color, Some(SignalColor::Red));
        assert!(report.message.contains("-0.5 per hour"));
    }

    #[test]
    fn ph_rise_is_flagged() {
        let readings = vec![reading(HOUR_MS, Some(7.5), None), reading(0, Some(7.0), None)];
        let report = analyze_trend(SensorParameter::Ph, &readings, 10, &AdvisorRules::default());
        assert_eq!(report.status, "Rapid Rise");
        assert_eq!(report.color, Some(SignalColor::Orange));
    }

    #[test]
    fn single_reading_is_unknown() {
        let readings = vec![reading(0, Some(7.0), None), reading(HOUR_MS, None, Some(25.0))];
        let report = analyze_trend(SensorParameter::Ph, &readings, 10, &AdvisorRules::default());
        assert_eq!(report.status, "Unknown");
        assert_eq!(report.rate_per_hour, 0.0);
        assert!(report.color.is_none());
    }

    #[test]
    fn identical_timestamps_are_an_error() {
        let readings = vec![reading(1_000, Some(7.0), None), reading(1_000, Some(6.0), None)];
        let report = analyze_trend(SensorParameter::Ph, &readings, 10, &AdvisorRules::default());
        assert_eq!(report.status, "Error");
        assert!(report.color.is_none());
    }

    #[test]
    fn window_limits_the_oldest_reading() {
        let readings = vec![
            reading(3 * HOUR_MS, Some(7.0), None),
            reading(2 * HOUR_MS, Some(7.0), None),
            reading(0, Some(4.0), None),
        ];
        let report = analyze_trend(SensorParameter::Ph, &readings, 2, &AdvisorRules::default());
        assert_eq!(report.status, "Stable");
        assert_eq!(report.rate_per_hour, 0.0);
    }

    #[test]
    fn temperature_shock_either_direction() {
        let readings = vec![
            reading(HOUR_MS, None, Some(22.0)),
            reading(0, None, Some(25.0)),
        ];
        let report = analyze_trend(
            SensorParameter::Temperature,
            &readings,
            10,
            &AdvisorRules::default(),
        );
        assert_eq!(report.status, "Temp Shock");
        assert_eq!(report.rate_per_hour, -3.0);
    }

    #[test]
    fn other_parameters_are_always_stable() {
        let mut fast = reading(HOUR_MS, None, None);
        fast.tds = Some(900.0);
        let mut slow = reading(0, None, None);
        slow.tds = Some(100.0);
        let report = analyze_trend(
            SensorParameter::Tds,
            &[fast, slow],
            10,
            &AdvisorRules::default(),
        );
        assert_eq!(report.status, "Stable");
        assert_eq!(report.rate_per_hour, 800.0);
    }
}
