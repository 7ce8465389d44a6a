//! 月度运行成本估算：电费、换水水费与耗材。

use crate::{AdvisorError, AdvisorRules, round_to};

/// 耗材一包能用多久。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseFrequency {
    Weekly,
    Monthly,
    Every3Months,
    Every6Months,
    Yearly,
}

impl ExpenseFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseFrequency::Weekly => "weekly",
            ExpenseFrequency::Monthly => "monthly",
            ExpenseFrequency::Every3Months => "every_3_months",
            ExpenseFrequency::Every6Months => "every_6_months",
            ExpenseFrequency::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "weekly" => Some(ExpenseFrequency::Weekly),
            "monthly" => Some(ExpenseFrequency::Monthly),
            "every_3_months" => Some(ExpenseFrequency::Every3Months),
            "every_6_months" => Some(ExpenseFrequency::Every6Months),
            "yearly" => Some(ExpenseFrequency::Yearly),
            _ => None,
        }
    }

    /// 折算到每月的花费。
    fn monthly(&self, price: f64) -> f64 {
        match self {
            ExpenseFrequency::Weekly => price * 4.3,
            ExpenseFrequency::Monthly => price,
            ExpenseFrequency::Every3Months => price / 3.0,
            ExpenseFrequency::Every6Months => price / 6.0,
            ExpenseFrequency::Yearly => price / 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Consumable {
    pub name: String,
    pub price: f64,
    pub frequency: ExpenseFrequency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomyRequest {
    /// 每千瓦时电价。
    pub electricity_price: f64,
    /// 每立方米水价。
    pub water_price_m3: f64,
    /// 每周换水百分比。
    pub water_change_percent: f64,
    pub consumables: Vec<Consumable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomyReport {
    pub total_monthly_cost: f64,
    pub currency: String,
    pub watts_total: f64,
    pub kwh_month: f64,
    pub electricity_cost: f64,
    pub water_volume_m3: f64,
    pub water_cost: f64,
    pub consumables_cost: f64,
    pub consumables_count: usize,
    pub message: String,
}

/// 估算一个水族箱的月度运行成本。
///
/// `device_watts` 为绑定到水族箱的设备功率，未声明功率的设备不计入。
pub fn calculate_monthly_cost(
    volume_l: f64,
    device_watts: &[Option<f64>],
    request: &EconomyRequest,
    rules: &AdvisorRules,
) -> Result<EconomyReport, AdvisorError> {
    if request.electricity_price < 0.0 || request.water_price_m3 < 0.0 {
        return Err(AdvisorError::Validation(
            "prices must not be negative".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&request.water_change_percent) {
        return Err(AdvisorError::Validation(
            "water change percent must be between 0 and 100".to_string(),
        ));
    }
    if request.consumables.iter().any(|item| item.price < 0.0) {
        return Err(AdvisorError::Validation(
            "consumable price must not be negative".to_string(),
        ));
    }

    let watts_total: f64 = device_watts.iter().flatten().sum();
    let monthly_kwh = watts_total * 24.0 * rules.device_duty_cycle / 1000.0 * rules.days_per_month;
    let electricity_cost = monthly_kwh * request.electricity_price;

    let monthly_water_l =
        volume_l * (request.water_change_percent / 100.0) * rules.water_changes_per_month;
    let water_volume_m3 = monthly_water_l / 1000.0;
    let water_cost = water_volume_m3 * request.water_price_m3;

    let consumables_cost: f64 = request
        .consumables
        .iter()
        .map(|item| item.frequency.monthly(item.price))
        .sum();

    let total = electricity_cost + water_cost + consumables_cost;
    Ok(EconomyReport {
        total_monthly_cost: round_to(total, 2),
        currency: rules.currency.clone(),
        watts_total,
        kwh_month: round_to(monthly_kwh, 1),
        electricity_cost: round_to(electricity_cost, 2),
        water_volume_m3: round_to(water_volume_m3, 3),
        water_cost: round_to(water_cost, 2),
        consumables_cost: round_to(consumables_cost, 2),
        consumables_count: request.consumables.len(),
        message: format!(
            "This tank costs you about {} {} per month.",
            total.trunc() as i64,
            rules.currency
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EconomyRequest {
        EconomyRequest {
            electricity_price: 2.64,
            water_price_m3: 30.0,
            water_change_percent: 30.0,
            consumables: vec![
                Consumable {
                    name: "Flake food".to_string(),
                    price: 300.0,
                    frequency: ExpenseFrequency::Every3Months,
                },
                Consumable {
                    name: "Water conditioner".to_string(),
                    price: 10.0,
                    frequency: ExpenseFrequency::Weekly,
                },
            ],
        }
    }

    #[test]
    fn combines_electricity_water_and_consumables() {
        let report = calculate_monthly_cost(
            100.0,
            &[Some(50.0), None, Some(50.0)],
            &request(),
            &AdvisorRules::default(),
        )
        .expect("report");

        assert_eq!(report.watts_total, 100.0);
        // 100 W * 24 h * 0.6 / 1000 * 30 = 43.2 kWh
        assert_eq!(report.kwh_month, 43.2);
        assert_eq!(report.electricity_cost, 114.05);
        // 100 L * 30% * 4 = 120 L
        assert_eq!(report.water_volume_m3, 0.12);
        assert_eq!(report.water_cost, 3.6);
        assert_eq!(report.consumables_cost, 143.0);
        assert_eq!(report.consumables_count, 2);
        assert_eq!(report.total_monthly_cost, 260.65);
        assert_eq!(report.message, "This tank costs you about 260 UAH per month.");
    }

    #[test]
    fn no_devices_means_no_electricity() {
        let mut req = request();
        req.consumables.clear();
        let report =
            calculate_monthly_cost(50.0, &[], &req, &AdvisorRules::default()).expect("report");
        assert_eq!(report.electricity_cost, 0.0);
        assert_eq!(report.total_monthly_cost, 1.8);
    }

    #[test]
    fn frequencies_parse_from_wire_names() {
        for frequency in [
            ExpenseFrequency::Weekly,
            ExpenseFrequency::Monthly,
            ExpenseFrequency::Every3Months,
            ExpenseFrequency::Every6Months,
            ExpenseFrequency::Yearly,
        ] {
            assert_eq!(ExpenseFrequency::parse(frequency.as_str()), Some(frequency));
        }
        assert_eq!(ExpenseFrequency::parse("daily"), None);
    }

    #[test]
    fn out_of_range_percent_is_rejected() {
        let mut req = request();
        req.water_change_percent = 150.0;
        let result = calculate_monthly_cost(50.0, &[], &req, &AdvisorRules::default());
        assert!(matches!(result, Err(AdvisorError::Validation(_))));
    }
}
