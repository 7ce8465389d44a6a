//! 目标区间推导。
//!
//! 温度与 pH 目标是所有放养物种容忍区间的交集；缺失的物种上下限
//! 按常见水族箱缺省值补齐。交集为空时照原样返回，并附带冲突诊断。

use crate::{AdvisorRules, StockedSpecies};

pub const TEMPERATURE_CONFLICT: &str = "incompatible livestock temperature requirements";
pub const PH_CONFLICT: &str = "incompatible livestock pH requirements";

/// 一次目标重算的结果。
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecalculation {
    pub temp_min: f64,
    pub temp_max: f64,
    pub ph_min: f64,
    pub ph_max: f64,
    pub conflicts: Vec<String>,
    /// 是否已写回水族箱（`auto_targets` 关闭时只计算不保存）。
    pub applied: bool,
}

/// 由放养物种推导目标区间。
///
/// 放养为空时返回 `None`，调用方保留原有目标。
pub fn derive_targets(
    stocking: &[StockedSpecies],
    rules: &AdvisorRules,
) -> Option<TargetRecalculation> {
    if stocking.is_empty() {
        return None;
    }
    let (mut temp_min, mut temp_max) = rules.open_temp;
    let (mut ph_min, mut ph_max) = rules.open_ph;
    for item in stocking {
        let species = &item.species;
        temp_min = temp_min.max(species.temp_min.unwrap_or(rules.default_temp.0));
        temp_max = temp_max.min(species.temp_max.unwrap_or(rules.default_temp.1));
        ph_min = ph_min.max(species.ph_min.unwrap_or(rules.default_ph.0));
        ph_max = ph_max.min(species.ph_max.unwrap_or(rules.default_ph.1));
    }

    let mut conflicts = Vec::new();
    if temp_min > temp_max {
        conflicts.push(TEMPERATURE_CONFLICT.to_string());
    }
    if ph_min > ph_max {
        conflicts.push(PH_CONFLICT.to_string());
    }
    Some(TargetRecalculation {
        temp_min,
        temp_max,
        ph_min,
        ph_max,
        conflicts,
        applied: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::tests::species;

    fn ranged(name: &str, temp: (f64, f64), ph: (f64, f64)) -> StockedSpecies {
        let mut record = species(name);
        record.temp_min = Some(temp.0);
        record.temp_max = Some(temp.1);
        record.ph_min = Some(ph.0);
        record.ph_max = Some(ph.1);
        StockedSpecies {
            species: record,
            quantity: 1,
        }
    }

    #[test]
    fn empty_stocking_keeps_existing_targets() {
        assert!(derive_targets(&[], &AdvisorRules::default()).is_none());
    }

    #[test]
    fn intersects_all_species_windows() {
        let stocking = vec![
            ranged("Neon", (20.0, 26.0), (5.5, 7.0)),
            ranged("Guppy", (22.0, 28.0), (6.8, 7.8)),
        ];
        let result = derive_targets(&stocking, &AdvisorRules::default()).expect("targets");
        assert_eq!((result.temp_min, result.temp_max), (22.0, 26.0));
        assert_eq!((result.ph_min, result.ph_max), (6.8, 7.0));
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn missing_bounds_fall_back_to_defaults() {
        let stocking = vec![StockedSpecies {
            species: species("Mystery"),
            quantity: 3,
        }];
        let result = derive_targets(&stocking, &AdvisorRules::default()).expect("targets");
        assert_eq!((result.temp_min, result.temp_max), (22.0, 28.0));
        assert_eq!((result.ph_min, result.ph_max), (6.0, 8.0));
    }

    #[test]
    fn empty_intersection_is_reported_not_clamped() {
        let stocking = vec![
            ranged("Goldfish", (10.0, 20.0), (7.0, 8.0)),
            ranged("Discus", (28.0, 31.0), (5.0, 6.5)),
        ];
        let result = derive_targets(&stocking, &AdvisorRules::default()).expect("targets");
        assert_eq!((result.temp_min, result.temp_max), (28.0, 20.0));
        assert_eq!((result.ph_min, result.ph_max), (7.0, 6.5));
        assert_eq!(result.conflicts, vec![TEMPERATURE_CONFLICT, PH_CONFLICT]);
    }

    #[test]
    fn order_of_stocking_does_not_matter() {
        let a = ranged("A", (21.0, 27.0), (6.2, 7.4));
        let b = ranged("B", (23.0, 29.0), (6.0, 7.9));
        let c = ranged("C", (18.0, 26.5), (6.5, 8.2));
        let rules = AdvisorRules::default();
        let forward = derive_targets(&[a.clone(), b.clone(), c.clone()], &rules);
        let backward = derive_targets(&[c, b, a], &rules);
        assert_eq!(forward, backward);
    }
}
