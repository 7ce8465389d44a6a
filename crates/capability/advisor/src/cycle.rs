//! 氮循环阶段判定。
//!
//! 判定规则是一张有序决策表，自上而下第一条命中即返回。
//! 多条条件互相重叠（例如崩溃判定必须先于亚硝酸盐峰值），
//! 所以表的顺序就是语义的一部分。

use crate::{AdvisorRules, SignalColor};
use aqua_storage::ManualMeasurementRecord;

/// 判定所需的输入信号。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSignals {
    /// 距开缸日的天数；未设置开缸日时为 `None`。
    pub days_since_start: Option<i64>,
    /// 最近一次手动测试的 (氨, 亚硝酸盐, 硝酸盐)，缺失值按 0 计。
    pub latest: Option<ToxinLevels>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxinLevels {
    pub ammonia: f64,
    pub nitrite: f64,
    pub nitrate: f64,
}

impl From<&ManualMeasurementRecord> for ToxinLevels {
    fn from(record: &ManualMeasurementRecord) -> Self {
        Self {
            ammonia: record.ammonia.unwrap_or(0.0),
            nitrite: record.nitrite.unwrap_or(0.0),
            nitrate: record.nitrate.unwrap_or(0.0),
        }
    }
}

impl CycleSignals {
    pub fn new(days_since_start: Option<i64>, latest: Option<&ManualMeasurementRecord>) -> Self {
        Self {
            days_since_start,
            latest: latest.map(ToxinLevels::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub status: &'static str,
    pub percent: u8,
    pub message: &'static str,
    pub color: Option<SignalColor>,
}

struct CyclePhase {
    status: &'static str,
    percent: u8,
    message: &'static str,
    color: Option<SignalColor>,
}

struct CycleRule {
    matches: fn(&CycleSignals, &AdvisorRules) -> bool,
    phase: CyclePhase,
}

fn days(signals: &CycleSignals) -> i64 {
    signals.days_since_start.unwrap_or(0)
}

fn blind(signals: &CycleSignals) -> bool {
    signals.days_since_start.is_some() && signals.latest.is_none()
}

fn tested(signals: &CycleSignals) -> Option<ToxinLevels> {
    signals.days_since_start.and(signals.latest)
}

fn all_clear(levels: ToxinLevels) -> bool {
    levels.ammonia == 0.0 && levels.nitrite == 0.0 && levels.nitrate == 0.0
}

const CYCLE_RULES: &[CycleRule] = &[
    CycleRule {
        matches: |signals, _| signals.days_since_start.is_none(),
        phase: CyclePhase {
            status: "Unknown",
            percent: 0,
            message: "Set the tank start date to track the nitrogen cycle.",
            color: None,
        },
    },
    CycleRule {
        matches: |signals, rules| blind(signals) && days(signals) < rules.new_tank_days,
        phase: CyclePhase {
            status: "New",
            percent: 5,
            message: "The tank has just been started. Begin adding an ammonia source.",
            color: None,
        },
    },
    CycleRule {
        matches: |signals, rules| blind(signals) && days(signals) < rules.blind_early_days,
        phase: CyclePhase {
            status: "Cycling (Blind)",
            percent: 20,
            message: "Bacteria colonies are forming. Test the water to see real progress.",
            color: None,
        },
    },
    CycleRule {
        matches: |signals, rules| blind(signals) && days(signals) < rules.blind_late_days,
        phase: CyclePhase {
            status: "Cycling (Blind)",
            percent: 70,
            message: "The cycle is probably well under way. Test ammonia and nitrite to confirm.",
            color: None,
        },
    },
    CycleRule {
        matches: |signals, _| blind(signals),
        phase: CyclePhase {
            status: "Probably Stable",
            percent: 95,
            message: "The tank is old enough to be cycled, but no test results confirm it.",
            color: None,
        },
    },
    CycleRule {
        matches: |signals, rules| {
            tested(signals).is_some_and(|levels| {
                days(signals) > rules.crash_after_days
                    && (levels.ammonia > rules.crash_toxin_level
                        || levels.nitrite > rules.crash_toxin_level)
            })
        },
        phase: CyclePhase {
            status: "CRASHED",
            percent: 0,
            message: "Toxins detected in an established tank. The biological filter may have failed.",
            color: Some(SignalColor::Red),
        },
    },
    CycleRule {
        matches: |signals, _| tested(signals).is_some_and(|levels| levels.nitrite > 0.0),
        phase: CyclePhase {
            status: "Cycling: Nitrite Spike",
            percent: 60,
            message: "Ammonia is being converted. Nitrite is toxic, keep livestock out.",
            color: Some(SignalColor::Orange),
        },
    },
    CycleRule {
        matches: |signals, _| {
            tested(signals).is_some_and(|levels| levels.ammonia > 0.0 && levels.nitrite == 0.0)
        },
        phase: CyclePhase {
            status: "Cycling: Ammonia Spike",
            percent: 25,
            message: "Ammonia is present and nitrifying bacteria are still establishing.",
            color: Some(SignalColor::Yellow),
        },
    },
    CycleRule {
        matches: |signals, _| {
            tested(signals).is_some_and(|levels| {
                levels.ammonia == 0.0 && levels.nitrite == 0.0 && levels.nitrate > 0.0
            })
        },
        phase: CyclePhase {
            status: "STABLE",
            percent: 100,
            message: "The nitrogen cycle is complete.",
            color: Some(SignalColor::Green),
        },
    },
    CycleRule {
        matches: |signals, rules| {
            tested(signals).is_some_and(|levels| all_clear(levels) && days(signals) < rules.sterile_days)
        },
        phase: CyclePhase {
            status: "New / Sterile",
            percent: 10,
            message: "No ammonia, nitrite or nitrate yet. Add an ammonia source to start the cycle.",
            color: Some(SignalColor::Grey),
        },
    },
    CycleRule {
        matches: |signals, _| tested(signals).is_some_and(all_clear),
        phase: CyclePhase {
            status: "Suspiciously Clean",
            percent: 100,
            message: "All readings are zero. Check the test kit expiry date or heavy plant uptake.",
            color: Some(SignalColor::Blue),
        },
    },
];

static ANALYZING: CyclePhase = CyclePhase {
    status: "Analyzing",
    percent: 50,
    message: "The readings do not match a known cycle phase yet.",
    color: None,
};

/// 估算水族箱生物过滤的成熟度。
pub fn predict_cycle_status(signals: &CycleSignals, rules: &AdvisorRules) -> CycleReport {
    let phase = CYCLE_RULES
        .iter()
        .find(|rule| (rule.matches)(signals, rules))
        .map(|rule| &rule.phase)
        .unwrap_or(&ANALYZING);
    CycleReport {
        status: phase.status,
        percent: phase.percent,
        message: phase.message,
        color: phase.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(days: i64, ammonia: f64, nitrite: f64, nitrate: f64) -> CycleSignals {
        CycleSignals {
            days_since_start: Some(days),
            latest: Some(ToxinLevels {
                ammonia,
                nitrite,
                nitrate,
            }),
        }
    }

    fn untested(days: i64) -> CycleSignals {
        CycleSignals {
            days_since_start: Some(days),
            latest: None,
        }
    }

    fn status(signals: CycleSignals) -> (&'static str, u8) {
        let report = predict_cycle_status(&signals, &AdvisorRules::default());
        (report.status, report.percent)
    }

    #[test]
    fn missing_start_date_is_unknown_even_with_tests() {
        let signals = CycleSignals {
            days_since_start: None,
            latest: Some(ToxinLevels {
                ammonia: 1.0,
                nitrite: 0.0,
                nitrate: 0.0,
            }),
        };
        assert_eq!(status(signals).0, "Unknown");
    }

    #[test]
    fn blind_estimates_follow_tank_age() {
        assert_eq!(status(untested(0)), ("New", 5));
        assert_eq!(status(untested(4)), ("New", 5));
        assert_eq!(status(untested(5)), ("Cycling (Blind)", 20));
        assert_eq!(status(untested(13)), ("Cycling (Blind)", 20));
        assert_eq!(status(untested(14)), ("Cycling (Blind)", 70));
        assert_eq!(status(untested(29)), ("Cycling (Blind)", 70));
        assert_eq!(status(untested(30)), ("Probably Stable", 95));
    }

    #[test]
    fn crash_check_preempts_spike_rules() {
        let report =
            predict_cycle_status(&measured(40, 0.3, 0.3, 10.0), &AdvisorRules::default());
        assert_eq!(report.status, "CRASHED");
        assert_eq!(report.percent, 0);
        assert_eq!(report.color, Some(SignalColor::Red));
    }

    #[test]
    fn young_tank_with_toxins_is_still_cycling() {
        assert_eq!(status(measured(20, 0.3, 0.3, 0.0)), ("Cycling: Nitrite Spike", 60));
        assert_eq!(status(measured(35, 0.5, 0.0, 0.0)), ("Cycling: Ammonia Spike", 25));
        assert_eq!(status(measured(40, 0.1, 0.0, 5.0)), ("Cycling: Ammonia Spike", 25));
    }

    #[test]
    fn clean_readings_depend_on_nitrate_and_age() {
        assert_eq!(status(measured(50, 0.0, 0.0, 20.0)), ("STABLE", 100));
        assert_eq!(status(measured(3, 0.0, 0.0, 0.0)), ("New / Sterile", 10));
        assert_eq!(status(measured(10, 0.0, 0.0, 0.0)), ("Suspiciously Clean", 100));
    }

    #[test]
    fn negative_readings_fall_through_to_analyzing() {
        assert_eq!(status(measured(12, -0.1, 0.0, 0.0)), ("Analyzing", 50));
    }

    #[test]
    fn missing_manual_values_count_as_zero() {
        let record = ManualMeasurementRecord {
            measurement_id: "m-1".to_string(),
            tank_id: "tank-1".to_string(),
            ts_ms: 0,
            ammonia: None,
            nitrite: None,
            nitrate: Some(15.0),
            gh: None,
            kh: None,
            phosphate: None,
        };
        let signals = CycleSignals::new(Some(60), Some(&record));
        assert_eq!(status(signals).0, "STABLE");
    }
}
