//! 维护任务判定。
//!
//! 三条规则相互独立，一次可触发 0 到 3 个任务。这里只决定需要哪些任务，
//! 去重（同一水族箱同名活跃任务至多一个）由 `AdvisorService` 在写入前检查。

use crate::{AdvisorRules, round_to};

pub const WATER_CHANGE_TITLE: &str = "Water change (high load)";
pub const FILTER_RINSE_TITLE: &str = "Filter rinse";
pub const TDS_WATER_CHANGE_TITLE: &str = "Critical water change (TDS)";

/// 任务判定的输入信号。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskSignals {
    pub days_since_water_change: i64,
    pub days_since_filter_clean: i64,
    pub bioload_percent: f64,
    pub current_tds: f64,
    pub max_tds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTask {
    pub title: &'static str,
    pub description: String,
}

/// 计算当前应存在的维护任务。
pub fn plan_tasks(signals: &TaskSignals, rules: &AdvisorRules) -> Vec<PlannedTask> {
    let mut planned = Vec::new();

    if signals.days_since_water_change > rules.water_change_interval_days
        && signals.bioload_percent > rules.bioload_alert_percent
    {
        planned.push(PlannedTask {
            title: WATER_CHANGE_TITLE,
            description: format!(
                "{} days since the last water change and the bioload is {}%. Change 30% of the water.",
                signals.days_since_water_change,
                round_to(signals.bioload_percent, 1)
            ),
        });
    }

    if signals.days_since_filter_clean > rules.filter_clean_interval_days {
        planned.push(PlannedTask {
            title: FILTER_RINSE_TITLE,
            description: format!(
                "The filter has not been cleaned for {} days. Rinse the sponges in tank water.",
                signals.days_since_filter_clean
            ),
        });
    }

    if signals.current_tds > signals.max_tds {
        planned.push(PlannedTask {
            title: TDS_WATER_CHANGE_TITLE,
            description: format!(
                "The TDS sensor reads {} ppm (limit {}). The water is too dirty.",
                signals.current_tds, signals.max_tds
            ),
        });
    }

    planned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> TaskSignals {
        TaskSignals {
            days_since_water_change: 1,
            days_since_filter_clean: 1,
            bioload_percent: 10.0,
            current_tds: 200.0,
            max_tds: 500.0,
        }
    }

    fn titles(signals: &TaskSignals) -> Vec<&'static str> {
        plan_tasks(signals, &AdvisorRules::default())
            .into_iter()
            .map(|task| task.title)
            .collect()
    }

    #[test]
    fn healthy_tank_needs_nothing() {
        assert!(titles(&quiet()).is_empty());
    }

    #[test]
    fn water_change_needs_both_age_and_bioload() {
        let mut signals = quiet();
        signals.days_since_water_change = 8;
        assert!(titles(&signals).is_empty());
        signals.bioload_percent = 80.0;
        assert!(titles(&signals).is_empty());
        signals.bioload_percent = 85.5;
        assert_eq!(titles(&signals), vec![WATER_CHANGE_TITLE]);
        signals.days_since_water_change = 7;
        assert!(titles(&signals).is_empty());
    }

    #[test]
    fn all_rules_can_fire_together() {
        let signals = TaskSignals {
            days_since_water_change: 999,
            days_since_filter_clean: 999,
            bioload_percent: 120.0,
            current_tds: 650.0,
            max_tds: 500.0,
        };
        assert_eq!(
            titles(&signals),
            vec![WATER_CHANGE_TITLE, FILTER_RINSE_TITLE, TDS_WATER_CHANGE_TITLE]
        );
    }

    #[test]
    fn tds_at_limit_is_fine() {
        let mut signals = quiet();
        signals.current_tds = 500.0;
        assert!(titles(&signals).is_empty());
        signals.current_tds = 500.5;
        let planned = plan_tasks(&signals, &AdvisorRules::default());
        assert!(planned[0].description.contains("500.5 ppm"));
    }
}
