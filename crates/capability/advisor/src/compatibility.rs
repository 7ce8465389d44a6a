//! 兼容性检查。
//!
//! 依次执行五条规则并累积警告，不短路、不排序、不去重：
//! 攻击性配对、水量、最小缸体、温度区间、pH 区间。

use crate::StockedSpecies;
use aqua_storage::{SpeciesRecord, TankRecord};
use domain::Aggressiveness;

/// 检查候选物种能否加入水族箱。
///
/// 返回空列表表示完全兼容。
pub fn check_compatibility(
    tank: &TankRecord,
    current: &[StockedSpecies],
    candidate: &SpeciesRecord,
    quantity: u32,
) -> Vec<String> {
    let mut warnings = Vec::new();
    check_aggression(current, candidate, &mut warnings);
    check_volume(tank, current, candidate, quantity, &mut warnings);
    check_tank_size(tank, candidate, &mut warnings);
    check_temperature(tank, candidate, &mut warnings);
    check_ph(tank, candidate, &mut warnings);
    warnings
}

fn check_aggression(current: &[StockedSpecies], candidate: &SpeciesRecord, warnings: &mut Vec<String>) {
    for existing in current {
        match (candidate.aggressiveness, existing.species.aggressiveness) {
            (Some(Aggressiveness::Aggressive), Some(Aggressiveness::Peaceful)) => {
                warnings.push(format!(
                    "Predation risk: {} is aggressive and may attack peaceful {}",
                    candidate.name, existing.species.name
                ));
            }
            (Some(Aggressiveness::Peaceful), Some(Aggressiveness::Aggressive)) => {
                warnings.push(format!(
                    "Predation risk: peaceful {} may be attacked by aggressive {}",
                    candidate.name, existing.species.name
                ));
            }
            _ => {}
        }
    }
}

fn check_volume(
    tank: &TankRecord,
    current: &[StockedSpecies],
    candidate: &SpeciesRecord,
    quantity: u32,
    warnings: &mut Vec<String>,
) {
    let existing: f64 = current
        .iter()
        .map(|item| item.species.min_water_volume_l.unwrap_or(0.0) * f64::from(item.quantity))
        .sum();
    let required = existing + candidate.min_water_volume_l.unwrap_or(0.0) * f64::from(quantity);
    if required > tank.volume_l {
        warnings.push(format!(
            "Overcrowding: livestock needs {:.1} L of water, tank holds {:.1} L",
            required, tank.volume_l
        ));
    }
}

fn check_tank_size(tank: &TankRecord, candidate: &SpeciesRecord, warnings: &mut Vec<String>) {
    if let Some(min_size) = candidate.min_tank_size_l {
        if min_size > tank.volume_l {
            warnings.push(format!(
                "Tank too small: {} needs at least {:.1} L, tank holds {:.1} L",
                candidate.name, min_size, tank.volume_l
            ));
        }
    }
}

fn check_temperature(tank: &TankRecord, candidate: &SpeciesRecord, warnings: &mut Vec<String>) {
    let Some((tank_min, tank_max)) = tank.targets.temp_range() else {
        return;
    };
    if let Some(needs_min) = candidate.temp_min {
        if needs_min > tank_max {
            warnings.push(format!(
                "Temperature conflict: {} needs at least {:.1} °C but the tank is kept at most {:.1} °C, it will freeze",
                candidate.name, needs_min, tank_max
            ));
        }
    }
    if let Some(needs_max) = candidate.temp_max {
        if needs_max < tank_min {
            warnings.push(format!(
                "Temperature conflict: {} tolerates at most {:.1} °C but the tank is kept at least {:.1} °C, it will cook",
                candidate.name, needs_max, tank_min
            ));
        }
    }
}

fn check_ph(tank: &TankRecord, candidate: &SpeciesRecord, warnings: &mut Vec<String>) {
    let Some((tank_min, tank_max)) = tank.targets.ph_range() else {
        return;
    };
    if let Some(needs_min) = candidate.ph_min {
        if needs_min > tank_max {
            warnings.push(format!(
                "pH conflict: {} needs pH of at least {:.1} but the tank is kept at most {:.1}, the water is too acidic",
                candidate.name, needs_min, tank_max
            ));
        }
    }
    if let Some(needs_max) = candidate.ph_max {
        if needs_max < tank_min {
            warnings.push(format!(
                "pH conflict: {} tolerates pH of at most {:.1} but the tank is kept at least {:.1}, the water is too alkaline",
                candidate.name, needs_max, tank_min
            ));
        }
    }
}
