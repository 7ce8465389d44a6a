//! 生物负载估算。

use crate::{AdvisorError, AdvisorRules, StockedSpecies, round_to};
use aqua_storage::TankRecord;

/// 生物负载红黄绿状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockingStatus {
    Green,
    Yellow,
    Red,
}

impl StockingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockingStatus::Green => "green",
            StockingStatus::Yellow => "yellow",
            StockingStatus::Red => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockingEstimate {
    pub percent: f64,
    pub status: StockingStatus,
}

/// 计算生物负载百分比。
///
/// 单体负载为体长（厘米），超过大体型阈值时乘以惩罚系数；
/// 百分比保留一位小数后再分档。水量必须大于 0，负体长按 0 计。
pub fn calculate_stocking(
    tank: &TankRecord,
    stocking: &[StockedSpecies],
    rules: &AdvisorRules,
) -> Result<StockingEstimate, AdvisorError> {
    if !tank.volume_l.is_finite() || tank.volume_l <= 0.0 {
        return Err(AdvisorError::Validation(
            "tank volume must be greater than zero".to_string(),
        ));
    }
    let total_load: f64 = stocking
        .iter()
        .map(|item| {
            let size = item.species.size_cm.unwrap_or(0.0).max(0.0);
            let single = if size > rules.large_body_cm {
                size * rules.large_body_factor
            } else {
                size
            };
            single * f64::from(item.quantity)
        })
        .sum();
    let percent = round_to(total_load / tank.volume_l * 100.0, 1);
    Ok(StockingEstimate {
        percent,
        status: status_for(percent, rules),
    })
}

fn status_for(percent: f64, rules: &AdvisorRules) -> StockingStatus {
    if percent <= rules.stocking_green_max {
        StockingStatus::Green
    } else if percent <= rules.stocking_yellow_max {
        StockingStatus::Yellow
    } else {
        StockingStatus::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::tests::{species, tank};

    fn sized(size_cm: f64, quantity: u32) -> StockedSpecies {
        let mut record = species("Fish");
        record.size_cm = Some(size_cm);
        StockedSpecies {
            species: record,
            quantity,
        }
    }

    #[test]
    fn empty_tank_is_green_zero() {
        let estimate =
            calculate_stocking(&tank(60.0), &[], &AdvisorRules::default()).expect("estimate");
        assert_eq!(estimate.percent, 0.0);
        assert_eq!(estimate.status, StockingStatus::Green);
    }

    #[test]
    fn large_body_penalty_applies_above_threshold_only() {
        let rules = AdvisorRules::default();
        let at_threshold = calculate_stocking(&tank(100.0), &[sized(15.0, 2)], &rules)
            .expect("estimate");
        assert_eq!(at_threshold.percent, 30.0);

        let above = calculate_stocking(&tank(100.0), &[sized(20.0, 2)], &rules).expect("estimate");
        assert_eq!(above.percent, 60.0);
    }

    #[test]
    fn percent_is_rounded_to_one_decimal() {
        let estimate = calculate_stocking(&tank(30.0), &[sized(3.0, 1)], &AdvisorRules::default())
            .expect("estimate");
        assert_eq!(estimate.percent, 10.0);

        let estimate = calculate_stocking(&tank(70.0), &[sized(2.0, 1)], &AdvisorRules::default())
            .expect("estimate");
        assert_eq!(estimate.percent, 2.9);
    }

    #[test]
    fn status_boundaries_are_inclusive_upwards() {
        let rules = AdvisorRules::default();
        let at_80 = calculate_stocking(&tank(100.0), &[sized(4.0, 20)], &rules).expect("estimate");
        assert_eq!(at_80.status, StockingStatus::Green);
        let above_80 =
            calculate_stocking(&tank(100.0), &[sized(4.1, 20)], &rules).expect("estimate");
        assert_eq!(above_80.status, StockingStatus::Yellow);
        let at_100 = calculate_stocking(&tank(100.0), &[sized(5.0, 20)], &rules).expect("estimate");
        assert_eq!(at_100.status, StockingStatus::Yellow);
        let over = calculate_stocking(&tank(100.0), &[sized(5.1, 20)], &rules).expect("estimate");
        assert_eq!(over.status, StockingStatus::Red);
    }

    #[test]
    fn negative_body_size_never_lowers_the_load() {
        let rules = AdvisorRules::default();
        let estimate = calculate_stocking(&tank(60.0), &[sized(-30.0, 2), sized(30.0, 1)], &rules)
            .expect("estimate");
        assert_eq!(estimate.percent, 75.0);
        assert_eq!(estimate.status, StockingStatus::Green);

        let alone = calculate_stocking(&tank(60.0), &[sized(-30.0, 2)], &rules).expect("estimate");
        assert_eq!(alone.percent, 0.0);
    }

    #[test]
    fn zero_volume_is_rejected() {
        let result = calculate_stocking(&tank(0.0), &[sized(3.0, 1)], &AdvisorRules::default());
        assert!(matches!(result, Err(AdvisorError::Validation(_))));
    }
}
